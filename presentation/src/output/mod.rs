pub mod console;
pub mod formatter;
pub mod json;

#[cfg(test)]
mod test_support;
