// src/core/bytes.rs

const KB: f64 = 1024.0;
const MB: f64 = KB * KB; // 1,048,576
const GB: f64 = KB * MB; // 1,073,741,824
const TB: f64 = KB * GB; // 1,099,511,627,776

/// Returns the given byte count as a human friendly `Bytes`, KB, MB, GB or TB string.
///
/// Counts of 1 KB and above are shown with two decimals. Smaller counts keep their
/// natural form (`"500 Bytes"`, `"1 Byte"`, `"0.5 Bytes"`).
pub fn human_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < KB {
        let unit = if bytes == 1.0 { "Byte" } else { "Bytes" };
        format!("{} {}", bytes, unit)
    } else if bytes < MB {
        format!("{:.2} KB", bytes / KB)
    } else if bytes < GB {
        format!("{:.2} MB", bytes / MB)
    } else if bytes < TB {
        format!("{:.2} GB", bytes / GB)
    } else {
        format!("{:.2} TB", bytes / TB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_counts_use_bytes() {
        assert_eq!(human_bytes(500.0), "500 Bytes");
        assert_eq!(human_bytes(0.0), "0 Bytes");
        assert_eq!(human_bytes(1023.0), "1023 Bytes");
        assert_eq!(human_bytes(0.5), "0.5 Bytes");
    }

    #[test]
    fn test_single_byte_is_singular() {
        assert_eq!(human_bytes(1.0), "1 Byte");
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(human_bytes(1024.0), "1.00 KB");
        assert_eq!(human_bytes(2048.0), "2.00 KB");
        assert_eq!(human_bytes(1536.0), "1.50 KB");
        assert_eq!(human_bytes(MB), "1.00 MB");
        assert_eq!(human_bytes(5.0 * GB), "5.00 GB");
        assert_eq!(human_bytes(TB), "1.00 TB");
        assert_eq!(human_bytes(2048.0 * TB), "2048.00 TB");
    }

    #[test]
    fn test_just_below_next_unit() {
        assert_eq!(human_bytes(MB - 1.0), "1024.00 KB");
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(human_bytes(-3.0), "-3 Bytes");
        assert_eq!(human_bytes(f64::INFINITY), "inf Bytes");
    }
}
