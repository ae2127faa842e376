pub mod classify;
pub mod session;
pub mod upload;
#[cfg(test)]
mod tests;
