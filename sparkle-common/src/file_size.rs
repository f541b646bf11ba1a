//! File name and size helpers

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Render a byte count with a B/K/M/G suffix and two decimals
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{:.2}B", bytes as f64)
    } else if bytes < MIB {
        format!("{:.2}K", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2}M", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2}G", bytes as f64 / GIB as f64)
    }
}

/// Lowercased extension (text after the last dot), or "" when there is none
pub fn file_ext(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) => file_name[pos + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// File name with its extension removed
pub fn remove_ext(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => &file_name[..pos],
        None => file_name,
    }
}
