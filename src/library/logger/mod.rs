pub mod impl_console;
#[cfg(test)]
pub mod impl_fake;
pub mod impl_log;
pub mod interface;
