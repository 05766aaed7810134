//! Panic payload formatting.
//!
//! Step wrappers and teardown finalizers catch panics; this renders the
//! payload into something worth putting in an error message.

use std::any::Any;

/// Render a panic payload as text.
///
/// String payloads are returned as-is, primitive numbers are formatted, and
/// anything else falls back to its `Debug` form.
///
/// # Examples
///
/// ```
/// use stepwise::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_display {
        ($($ty:ty),* $(,)?) => {
            None$(.or_else(|| payload.downcast_ref::<$ty>().map(ToString::to_string)))*
        };
    }

    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .or_else(|| try_display!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64))
        .unwrap_or_else(|| format!("{payload:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caught(f: impl FnOnce() + std::panic::UnwindSafe) -> String {
        match std::panic::catch_unwind(f) {
            Ok(()) => panic!("closure should panic"),
            Err(payload) => panic_message(payload.as_ref()),
        }
    }

    #[test]
    fn renders_str_and_string_payloads() {
        assert_eq!(caught(|| panic!("static")), "static");
        assert_eq!(caught(|| panic!("formatted {}", 7)), "formatted 7");
    }

    #[test]
    fn renders_numeric_payloads() {
        assert_eq!(caught(|| std::panic::panic_any(42_u32)), "42");
    }

    #[test]
    fn falls_back_to_debug() {
        let payload: Box<dyn Any + Send> = Box::new(());
        assert!(panic_message(payload.as_ref()).contains("Any"));
    }
}
