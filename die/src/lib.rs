pub const RED: &str = "\x1b[91m";
pub const RESET: &str = "\x1b[0m";

/// wrap a message in the terminal escape codes
/// that make it show up red
pub fn red<S: AsRef<str>>(msg: S) -> String {
    format!("{}{}{}", RED, msg.as_ref(), RESET)
}

/// print a red message to stderr and exit.
/// Example:
/// ```no_run
/// # use die::die;
/// let bad_condition = true;
/// if bad_condition { die!("Oops, the condition was {}", bad_condition) }
/// if bad_condition { die!(2; "exits with 2 instead of 1") }
/// ```
#[macro_export]
macro_rules! die {
    () => (::std::process::exit(1));
    ($x:expr; $($y:expr),+) => ({
        eprintln!("{}", $crate::red(format!($($y),+)));
        ::std::process::exit($x)
    });
    ($($y:expr),+) => ({
        eprintln!("{}", $crate::red(format!($($y),+)));
        ::std::process::exit(1)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_wraps_message_in_escape_codes() {
        let s = red("Errors occurred");
        assert!(s.starts_with("\x1b[91m"));
        assert!(s.ends_with("\x1b[0m"));
        assert!(s.contains("Errors occurred"));
    }
}
