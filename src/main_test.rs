use serde_json::json;
use swatchboard::frame::Status;

use super::*;

fn request(syscall: &str) -> Frame {
    let mut data = Data::new();
    data.insert("foreground".to_owned(), json!(12));
    data.insert("background".to_owned(), json!(1));
    Frame::request(syscall, data)
}

#[test]
fn host_accepts_attribute_request() {
    let reply = accept_request(&request(syscall::SELECT_ATTRIBUTE));
    assert_eq!(reply.status, Status::Done);
    assert_eq!(reply.index("foreground"), Some(12));
    assert_eq!(reply.index("background"), Some(1));
    assert_eq!(reply.from.as_deref(), Some("host"));
}

#[test]
fn host_refuses_other_requests() {
    let reply = accept_request(&request("open_dialog"));
    assert_eq!(reply.status, Status::Error);
    assert_eq!(reply.message(), Some("unsupported request"));
}

#[test]
fn oversized_grid_override_is_rejected() {
    let cli = Cli::parse_from(["swatchboard", "--columns", "4096", "--rows", "4096"]);
    let err = apply_overrides(PanelConfig::default(), &cli).expect_err("grid too large");
    assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
}
