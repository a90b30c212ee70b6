use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("QUOTR_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid QUOTR_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("QUOTR_LLM_NAME") {
            self.llm.name = v;
        }
        if let Ok(v) = std::env::var("QUOTR_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("QUOTR_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("QUOTR_LLM_MAX_TOKENS")
            && let Ok(n) = v.parse::<u32>()
        {
            self.llm.max_tokens = n;
        }
        if let Ok(v) = std::env::var("QUOTR_CHUNK_SIZE")
            && let Ok(n) = v.parse::<usize>()
        {
            self.splitter.chunk_size = n;
        }
        if let Ok(v) = std::env::var("QUOTR_CHUNK_OVERLAP")
            && let Ok(n) = v.parse::<usize>()
        {
            self.splitter.chunk_overlap = n;
        }
        if let Ok(v) = std::env::var("QUOTR_MAX_FILE_SIZE")
            && let Ok(bytes) = v.parse::<u64>()
        {
            self.documents.max_file_size = bytes;
        }
        if let Ok(v) = std::env::var("QUOTR_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_seconds = secs;
        }
    }
}
