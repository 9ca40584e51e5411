//! Live smoke run against real hosts.
//!
//! ```text
//! RUST_LOG=debug cargo run --example live_get -- [URL] [CLIENT_CERT_PEM]
//! ```
//!
//! Proxy settings are taken from `http_proxy` / `no_proxy`.
use simple_client::{Client, ClientError, RequestParams};

fn main() -> Result<(), ClientError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args.next();
    let cert = args.next();

    let mut client = Client::new();

    match url {
        Some(url) => {
            let params = cert.map(|path| RequestParams::new().ssl_client_cert(path));
            client.get(&url, params)?;
            println!("{url}: {:?}", client.response_code());
        }
        None => {
            for url in ["http://www.google.co.uk", "https://www.google.co.uk"] {
                client.get(url, None)?;
                println!("{url}: {:?}", client.response_code());
            }
        }
    }

    for (name, value) in client.response_headers() {
        log::debug!("{name}: {value}");
    }

    Ok(())
}
