//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> String {
    r##"# duochat configuration
# Only override what you want to change -- missing fields use defaults.
# Credentials are never read from or written to this file.

[chat]
# default_provider = "openai"   # openai, gemini
# title = "💬 Chatbot"

[openai]
# model = "gpt-3.5-turbo"
# base_url = "https://api.openai.com/v1"
# temperature = 0.7             # 0.0-2.0, unset = provider default
# connect_timeout_secs = 10     # 1-600
# request_timeout_secs = 120    # 1-600

[gemini]
# location = "us-central1"
# endpoint = ""                 # endpoint id, "endpoints/<id>" or "publishers/<p>/models/<m>"
# project = ""                  # overrides project_id from the key file
# api_root = ""                 # replaces https://<location>-aiplatform.googleapis.com
# connect_timeout_secs = 10     # 1-600
# request_timeout_secs = 120    # 1-600

[logging]
# level = "warn"                # trace, debug, info, warn, error
"##
    .to_string()
}
