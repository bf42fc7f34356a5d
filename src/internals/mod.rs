mod memoized;

#[cfg(test)]
pub(crate) mod log_capture;

#[cfg(test)]
pub use memoized::Memo;
pub use memoized::Memoized;
