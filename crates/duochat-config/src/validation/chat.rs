use crate::schema::DuochatConfig;

use super::helpers::validate_non_empty;

pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &DuochatConfig) {
    validate_non_empty(errors, "chat.title", &config.chat.title);
}
