mod client_ip;

pub use client_ip::{extract_client_ip, extract_forwarded_ip_from_headers};
