use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use super::*;

/// Answer one connection per reply, in order, and hand back each request head.
fn serve(replies: Vec<(&'static str, &'static [u8])>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in replies {
            let (mut stream, _) = listener.accept().unwrap();
            requests.push(read_head(&mut stream));
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        }
        requests
    });
    (base_url, handle)
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn client(base_url: &str) -> PlexClient {
    PlexClient::new(&CatalogConfig {
        base_url: base_url.to_string(),
        token: "secret-token".to_string(),
        token_header: "X-Plex-Token".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

const SECTIONS_JSON: &[u8] = br#"{"MediaContainer": {"Directory": [
    {"key": "1", "title": "TV Shows", "type": "show"},
    {"key": "7", "title": "Movies", "type": "movie"}
]}}"#;

const COLLECTIONS_JSON: &[u8] = br#"{"MediaContainer": {"Metadata": [
    {"title": "Alien Collection", "thumb": "/library/collections/101/composite/1"},
    {"title": "No Art"}
]}}"#;

fn sections() -> Vec<LibrarySection> {
    vec![
        LibrarySection {
            key: "1".to_string(),
            title: "Movies".to_string(),
            kind: "movie".to_string(),
        },
        LibrarySection {
            key: "4".to_string(),
            title: "Kids Movies".to_string(),
            kind: "movie".to_string(),
        },
    ]
}

#[test]
fn test_find_section_exact_title() {
    let sections = sections();
    let found = find_section(&sections, "Kids Movies").unwrap();
    assert_eq!(found.key, "4");
}

#[test]
fn test_find_section_is_case_sensitive() {
    let sections = sections();
    assert!(find_section(&sections, "movies").is_err());
}

#[test]
fn test_find_section_not_found_lists_available() {
    let sections = sections();
    let err = find_section(&sections, "Anime").unwrap_err();
    match &err {
        CatalogError::LibraryNotFound { name, available } => {
            assert_eq!(name, "Anime");
            assert_eq!(available, &vec!["Movies".to_string(), "Kids Movies".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Library \"Anime\" not found (available: Movies, Kids Movies)"
    );
}

#[test]
fn test_collections_path() {
    assert_eq!(collections_path("4"), "/library/sections/4/all?type=18");
}

#[test]
fn test_join_url() {
    let base = "http://127.0.0.1:32400";
    assert_eq!(
        join_url(base, "/library/collections/9/thumb/1").unwrap(),
        "http://127.0.0.1:32400/library/collections/9/thumb/1"
    );
    assert_eq!(
        join_url(base, "library/sections").unwrap(),
        "http://127.0.0.1:32400/library/sections"
    );
    assert_eq!(
        join_url(base, "http://127.0.0.1:32400/photo/1.jpg").unwrap(),
        "http://127.0.0.1:32400/photo/1.jpg"
    );
}

#[test]
fn test_join_url_refuses_other_origins() {
    let base = "http://127.0.0.1:32400";
    for foreign in [
        "https://images.example.com/a.jpg",
        "http://127.0.0.1:8080/a.jpg",
        "https://127.0.0.1:32400/a.jpg",
    ] {
        match join_url(base, foreign) {
            Err(CatalogError::ForeignUrl { url }) => assert_eq!(url, foreign),
            other => panic!("{foreign}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_new_rejects_bad_header_name() {
    let config = CatalogConfig {
        base_url: "http://127.0.0.1:32400".to_string(),
        token: "abc".to_string(),
        token_header: "X Bad Header".to_string(),
        timeout_secs: 5,
    };
    assert!(matches!(PlexClient::new(&config), Err(CatalogError::Config(_))));
}

#[test]
fn test_fetch_poster_without_ref_is_no_poster() {
    let config = CatalogConfig {
        base_url: "http://127.0.0.1:32400".to_string(),
        token: "abc".to_string(),
        token_header: "X-Plex-Token".to_string(),
        timeout_secs: 5,
    };
    let client = PlexClient::new(&config).unwrap();
    let item = CollectionItem::new("Bare", None);
    assert!(matches!(
        client.fetch_poster(&item),
        Err(CatalogError::NoPoster { .. })
    ));
}

#[test]
fn test_list_collections_sends_token_and_requests_in_order() {
    let (base_url, server) = serve(vec![
        ("200 OK", SECTIONS_JSON),
        ("200 OK", COLLECTIONS_JSON),
    ]);

    let items = client(&base_url).list_collections("Movies").unwrap();
    assert_eq!(
        items,
        vec![
            CollectionItem::new(
                "Alien Collection",
                Some("/library/collections/101/composite/1".to_string())
            ),
            CollectionItem::new("No Art", None),
        ]
    );

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /library/sections HTTP/1.1\r\n"), "{}", requests[0]);
    assert!(
        requests[1].starts_with("GET /library/sections/7/all?type=18 HTTP/1.1\r\n"),
        "{}",
        requests[1]
    );
    for request in &requests {
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("\r\nx-plex-token: secret-token\r\n"), "{request}");
        assert!(lower.contains("\r\naccept: application/json\r\n"), "{request}");
    }
}

#[test]
fn test_unknown_library_stops_after_sections() {
    let (base_url, server) = serve(vec![("200 OK", SECTIONS_JSON)]);

    let err = client(&base_url).list_collections("Anime").unwrap_err();
    assert!(matches!(err, CatalogError::LibraryNotFound { .. }));
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn test_fetch_poster_returns_body() {
    let (base_url, server) = serve(vec![("200 OK", b"\x89PNG fake bytes".as_slice())]);

    let item = CollectionItem::new("Alien", Some("/library/collections/9/thumb/1".to_string()));
    let bytes = client(&base_url).fetch_poster(&item).unwrap();
    assert_eq!(bytes, b"\x89PNG fake bytes");

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /library/collections/9/thumb/1 HTTP/1.1\r\n"));
}

#[test]
fn test_fetch_poster_error_status() {
    let (base_url, server) = serve(vec![("404 Not Found", b"".as_slice())]);

    let item = CollectionItem::new("Alien", Some("/library/collections/9/thumb/1".to_string()));
    match client(&base_url).fetch_poster(&item) {
        Err(CatalogError::Status { status, path }) => {
            assert_eq!(status, 404);
            assert_eq!(path, "/library/collections/9/thumb/1");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_unparsable_body_is_api_error_with_preview() {
    let (base_url, server) = serve(vec![("200 OK", b"<html>Unauthorized</html>".as_slice())]);

    match client(&base_url).list_sections() {
        Err(CatalogError::Api(msg)) => {
            assert!(msg.starts_with("Failed to parse /library/sections:"), "{msg}");
            assert!(msg.ends_with("Response: <html>Unauthorized</html>"), "{msg}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_foreign_poster_ref_sends_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let item = CollectionItem::new("Alien", Some("http://images.example.invalid/a.jpg".to_string()));
    assert!(matches!(
        client(&base_url).fetch_poster(&item),
        Err(CatalogError::ForeignUrl { .. })
    ));
    assert!(listener.accept().is_err());
}
