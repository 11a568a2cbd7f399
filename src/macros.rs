#[macro_export]
/// Macro for aborting the process on an unrecoverable startup error.
/// Prints a PANIC diagnostic with the source location and reason to stderr,
/// then exits with a non-zero status.
macro_rules! fatal {
    ($($arg:tt)*) => {{
        eprintln!("PANIC {}:{}: {}", file!(), line!(), format_args!($($arg)*));
        ::std::process::exit(1);
    }};
}
