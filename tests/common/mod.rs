#![allow(dead_code)]

pub mod test_server {
    use frontctl::app::build_dispatcher;
    use frontctl::config::AppConfig;
    use frontctl::controllers::Stores;
    use frontctl::dispatcher::Dispatcher;
    use frontctl::server::{serve, ServerHandle};
    use std::net::{SocketAddr, TcpListener};
    use std::path::PathBuf;
    use std::sync::{Arc, Once};

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x20000);
        });
    }

    /// The bundled templates shipped with the crate.
    pub fn views_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("views")
    }

    /// Dispatcher for the bundled routes, rendering from [`views_dir`].
    pub fn bundled_dispatcher(stores: &Stores) -> Dispatcher {
        let mut config = AppConfig::default();
        config.views.dir = views_dir();
        build_dispatcher(&config, stores).unwrap()
    }

    /// Running server on a random local port, stopped on drop.
    pub struct TestServer {
        handle: Option<ServerHandle>,
        addr: SocketAddr,
        pub stores: Stores,
    }

    impl TestServer {
        pub fn start() -> Self {
            setup_may_runtime();
            let stores = Stores::default();
            let dispatcher = Arc::new(bundled_dispatcher(&stores));

            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let handle = serve(dispatcher, addr).unwrap();
            handle.wait_ready().unwrap();

            Self {
                handle: Some(handle),
                addr,
                stores,
            }
        }

        pub fn addr(&self) -> SocketAddr {
            self.addr
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Write a raw HTTP/1.1 request and read until the server goes quiet.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(300)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// `GET path` with no body.
    pub fn get(addr: &SocketAddr, path: &str) -> String {
        send_request(addr, &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"))
    }

    /// `POST path` with a url-encoded form body.
    pub fn post_form(addr: &SocketAddr, path: &str, form: &str) -> String {
        send_request(
            addr,
            &format!(
                "POST {path} HTTP/1.1\r\nHost: localhost\r\n\
                 Content-Type: application/x-www-form-urlencoded\r\n\
                 Content-Length: {}\r\n\r\n{form}",
                form.len()
            ),
        )
    }

    pub struct Parts {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl Parts {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    pub fn parse_parts(resp: &str) -> Parts {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut status = 0;
        let mut headers = Vec::new();
        for line in head.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                headers.push((name.trim().to_string(), val.trim().to_string()));
            }
        }
        Parts {
            status,
            headers,
            body: body.to_string(),
        }
    }
}
