//! Formatting utilities

use glam::Vec3;
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a vector with a fixed number of decimals
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

/// Format a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1.02 kB");
        assert_eq!(format_bytes(1048576), "1.05 MB");
    }

    #[test]
    fn test_format_vec3() {
        assert_eq!(format_vec3(Vec3::new(1.0, -0.5, 2.126)), "(1.00, -0.50, 2.13)");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(50.0), "50.0%");
        assert_eq!(format_percentage(33.333), "33.3%");
    }
}
