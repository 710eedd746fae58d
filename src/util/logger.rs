use std::fmt::{Debug, Display, Formatter};

/// A leveled debug logger for the scanner.
///
/// There is no external logging crate backing this: the teacher this project grew out of
/// never took on one either, and a handful of ad-hoc trace points don't earn one.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Relative ordering of log levels, from quietest to most verbose.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Trace a successfully read token at the given line. A no-op in release builds.
    pub fn trace_token<T: Debug>(&self, line: usize, token: &T) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success(()).order() {
            println!("[{}; token]: {:?} @ line {}", self, token, line);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (line, token);
        }
    }

    /// Trace a declaration-parser error at the given line. A no-op in release builds.
    pub fn trace_error(&self, line: usize, message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            eprintln!("[{}; error]: {} @ line {}", self, message, line);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (line, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_monotonic() {
        assert!(Log::<()>::None.order() < Log::Default(()).order());
        assert!(Log::Default(()).order() < Log::Success(()).order());
        assert!(Log::Success(()).order() < Log::Result(()).order());
        assert!(Log::Result(()).order() < Log::Verbose(()).order());
    }
}
