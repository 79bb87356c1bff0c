//! Basic example driving the cookie session storage with an in-memory
//! cookie jar

use cookie_session_storage::{
    CookieSessionStorage, CookieSlot, CookieTransport, MemoryTransport, SessionData,
    SessionStorage, StorageConfig,
};

#[tokio::main]
async fn main() {
    // Set up logging
    tracing_subscriber::fmt::init();

    // One jar plays the role of a browser; the storage holds a clone of it
    let jar = MemoryTransport::new();

    // Configure the storage: signed payloads, compressed, 1 hour lifetime
    let config = StorageConfig::new("your-super-secret-key-change-in-production")
        .with_cookie_name("sessiondata")
        .with_compression(true)
        .with_lifetime(3600);

    let storage = match CookieSessionStorage::new(jar.clone(), config) {
        Ok(storage) => storage,
        Err(err) => {
            tracing::error!("failed to build session storage: {}", err);
            return;
        }
    };

    let id = CookieSessionStorage::<MemoryTransport>::generate_id();
    println!("Session ID: {}", id);

    // First request: nothing stored yet
    let data = storage.read(&id).await;
    println!("First read: {} bytes", data.len());

    // Log a user in and count a view
    let mut session = SessionData::from_bytes(&data).expect("session data parses");
    session.set("user", "alice");
    session.set("views", 1);
    storage
        .write(&id, &session.to_bytes().expect("session data serializes"))
        .await
        .expect("session write succeeds");
    println!(
        "Wrote session, cookie value is {} bytes",
        jar.get_cookie("sessiondata").expect("cookie is set").len()
    );

    // Next request: read it back and bump the counter
    let mut session =
        SessionData::from_bytes(&storage.read(&id).await).expect("session data parses");
    let views: i32 = session.get("views").unwrap_or(0);
    println!(
        "Hello {}! You have viewed this page {} time(s).",
        session.get::<String>("user").unwrap_or_default(),
        views
    );
    session.set("views", views + 1);
    storage
        .write(&id, &session.to_bytes().expect("session data serializes"))
        .await
        .expect("session write succeeds");

    // A tampered cookie degrades to an empty session instead of an error
    let mut value = jar.get_cookie("sessiondata").expect("cookie is set");
    value[0] ^= 0xff;
    jar.set_cookie(CookieSlot {
        name: "sessiondata".to_string(),
        value,
        expires: None,
        path: "/".to_string(),
        domain: None,
        secure: false,
        http_only: true,
    })
    .expect("cookie set succeeds");
    let data = storage.read(&id).await;
    println!("Read after tampering: {} bytes", data.len());

    // Log out
    storage.destroy(&id).await.expect("session destroy succeeds");
    println!("Destroyed session, jar is empty: {}", jar.is_empty());
}
