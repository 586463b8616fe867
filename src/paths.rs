//! POSIX-style path arithmetic over string paths.
//!
//! Import specifiers and project-relative paths are always slash
//! separated regardless of host platform, so resolution works on plain
//! strings instead of `std::path::Path`. All functions are pure.

/// Join path fragments with a single `/`, collapsing duplicate slashes
/// but preserving a leading one.
pub fn join(parts: &[&str]) -> String {
    let joined = parts.join("/");
    let mut out = String::with_capacity(joined.len());
    let mut prev_slash = false;
    for c in joined.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Directory part of a path; `.` when there is no slash.
pub fn dirname(p: &str) -> &str {
    match p.rfind('/') {
        None => ".",
        Some(0) => "/",
        Some(i) => &p[..i],
    }
}

/// Extension including the dot, or empty for dotless and dotfile names.
pub fn extname(p: &str) -> &str {
    match p.rfind('.') {
        Some(i) if i > 0 && p.rfind('/').map_or(true, |s| s < i) => &p[i..],
        _ => "",
    }
}

/// Resolve fragments right to left into an absolute normalized path,
/// treating `/` as the working directory.
pub fn resolve(args: &[&str]) -> String {
    let mut resolved = String::new();
    let mut absolute = false;

    for part in args.iter().rev().chain(std::iter::once(&"/")) {
        if absolute {
            break;
        }
        if part.is_empty() {
            continue;
        }
        resolved = format!("{part}/{resolved}");
        absolute = part.starts_with('/');
    }

    let mut stack: Vec<&str> = Vec::new();
    for part in resolved.split('/').filter(|p| !p.is_empty()) {
        match part {
            ".." => {
                stack.pop();
            }
            "." => {}
            _ => stack.push(part),
        }
    }

    let body = stack.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, false) => body,
        (false, true) => ".".to_string(),
    }
}

/// Relative path from `from` to `to`, both already normalized.
pub fn relative(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty() && *p != ".").collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_parts.len() - common;
    let mut parts: Vec<&str> = vec![".."; ups];
    parts.extend(&to_parts[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
