//! Box Share Links
//!
//! Every box label carries a QR code pointing at that box's detail
//! page. The URL and the label filename are derived here; rendering the
//! QR image and driving the print dialog belong to the presentation
//! layer.

use std::env;

pub const ENV_APP_URL: &str = "BOXSORT_APP_URL";

const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Base URL box links point at; falls back to the local dev server
pub fn app_base_url() -> String {
    match env::var(ENV_APP_URL) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_APP_URL.to_string(),
    }
}

/// URL a box's QR code resolves to
pub fn box_qr_url(base_url: &str, box_id: &str) -> String {
    format!("{}/box/{}", base_url.trim_end_matches('/'), box_id)
}

/// Download filename for a box's QR label image
pub fn qr_label_filename(funky_name: &str) -> String {
    format!("qr-{}.png", funky_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_qr_url_joins_cleanly() {
        assert_eq!(
            box_qr_url("https://boxsort.example", "boxes-7"),
            "https://boxsort.example/box/boxes-7"
        );
        assert_eq!(
            box_qr_url("https://boxsort.example/", "boxes-7"),
            "https://boxsort.example/box/boxes-7"
        );
    }

    #[test]
    fn test_label_filename_uses_funky_name() {
        assert_eq!(qr_label_filename("purple-tiger-cloud"), "qr-purple-tiger-cloud.png");
    }
}
