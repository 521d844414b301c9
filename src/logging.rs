/// Conditional console logging for development builds
///
/// `log!` reports pipeline progress (buffer sizes, upload steps) to the
/// browser console. It is compiled out of release builds unless the
/// `console_logging` feature is enabled. Failures go through
/// `leptos::logging::error!` regardless of build profile.
///
/// # Examples
///
/// ```ignore
/// use crate::logging::log;
///
/// log!("Timetable geometry: {} vertices", vertex_count);
/// ```
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            let message = format!($($arg),+);
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&message.into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{message}");
        }
    };
}

pub use log;
