//! Directory path normalization.

/// Normalizes a `/`-joined path as a directory.
///
/// Backslashes become `/`, repeated separators collapse, `.` segments drop,
/// `..` pops the previous segment (never above the root), and the result
/// always ends with `/`. A leading `/` or a `C:` drive prefix is preserved.
pub fn normalize_dir(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." && !is_drive(last) => {
                    parts.pop();
                }
                Some(&last) if is_drive(last) => {}
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let mut out = String::with_capacity(unified.len() + 1);
    if absolute {
        out.push('/');
    }
    for part in parts {
        out.push_str(part);
        out.push('/');
    }
    if out.is_empty() {
        out.push_str("./");
    }
    out
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
