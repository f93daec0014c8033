mod error_location;
mod http_status;
mod redacted_key;
