//! Shell configuration
//!
//! The two limits scripts rely on (open handle capacity and tokens per line)
//! plus the tunables of the copy loop and the prompt.

/// Maximum number of concurrently open handles
pub const MAX_OPEN_FILES: usize = 256;
/// Maximum tokens per input line, command name included
pub const MAX_TOKENS: usize = 6;
/// Chunk size used when streaming a copy
pub const COPY_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_PROMPT: &str = "Enter command: ";

/// Runtime configuration for the shell
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub capacity: usize,
    pub max_tokens: usize,
    pub copy_chunk_size: usize,
    pub prompt: String,
}

impl ShellConfig {
    /// Create a configuration with the standard limits
    pub fn new() -> Self {
        Self {
            capacity: MAX_OPEN_FILES,
            max_tokens: MAX_TOKENS,
            copy_chunk_size: COPY_CHUNK_SIZE,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the copy chunk size; zero is bumped to one byte
    pub fn with_copy_chunk_size(mut self, copy_chunk_size: usize) -> Self {
        self.copy_chunk_size = copy_chunk_size.max(1);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_constants() {
        assert_eq!(MAX_OPEN_FILES, 256);
        assert_eq!(MAX_TOKENS, 6);
    }

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.capacity, MAX_OPEN_FILES);
        assert_eq!(config.max_tokens, MAX_TOKENS);
        assert_eq!(config.copy_chunk_size, COPY_CHUNK_SIZE);
        assert_eq!(config.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_config_setters() {
        let config = ShellConfig::new()
            .with_capacity(4)
            .with_max_tokens(3)
            .with_copy_chunk_size(0)
            .with_prompt("$ ");
        assert_eq!(config.capacity, 4);
        assert_eq!(config.max_tokens, 3);
        assert_eq!(config.copy_chunk_size, 1);
        assert_eq!(config.prompt, "$ ");
    }
}
