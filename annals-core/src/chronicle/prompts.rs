//! Prompt loading for the chronicler
//!
//! Loads the system instruction and user template from `.annals/` with
//! fallback to the platform config directory:
//! - Linux: `~/.config/annals/`
//! - macOS: `~/Library/Application Support/annals/`
//! - Windows: `%APPDATA%\annals\`

use std::path::Path;
use tracing::debug;

/// Default system instruction - frames the model as a museum historian
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "你是一位精通中国历史的资深历史学家。请提供学术性强、准确且引人入胜的内容，适合作为博物馆的深度导览。";

/// Default user template
///
/// Placeholders: `{{name}}`, `{{localized_name}}`, `{{language}}`.
pub const DEFAULT_USER_TEMPLATE: &str =
    "请针对中国历史上的{{localized_name}}（{{name}}）提供一份详尽的历史分析。重点关注历史准确性和文化深度。请以{{language}}回复。";

/// Loaded prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChroniclePrompts {
    pub system_instruction: String,
    pub user_template: String,
}

impl Default for ChroniclePrompts {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            user_template: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

impl ChroniclePrompts {
    /// Load prompts from the annals directories
    ///
    /// Lookup order for each file:
    /// 1. Project: `.annals/{system,user}.txt`
    /// 2. Global: `~/.config/annals/{system,user}.txt`
    /// 3. Built-in default
    pub fn load(project_dir: Option<&Path>, global_dir: Option<&Path>) -> Self {
        let system_instruction = Self::load_file("system.txt", project_dir, global_dir)
            .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string());

        let user_template = Self::load_file("user.txt", project_dir, global_dir)
            .unwrap_or_else(|| DEFAULT_USER_TEMPLATE.to_string());

        Self {
            system_instruction,
            user_template,
        }
    }

    fn load_file(filename: &str, project_dir: Option<&Path>, global_dir: Option<&Path>) -> Option<String> {
        for dir in [project_dir, global_dir].into_iter().flatten() {
            let path = dir.join(filename);
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) if !content.trim().is_empty() => {
                    debug!("Loaded {} from {}", filename, path.display());
                    return Some(content);
                }
                Ok(_) => {
                    tracing::warn!("Ignoring empty prompt file {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                }
            }
        }

        None
    }

    /// Render the user message for one era
    pub fn render_user_message(&self, name: &str, localized_name: &str, language: &str) -> String {
        self.user_template
            .replace("{{name}}", name)
            .replace("{{localized_name}}", localized_name)
            .replace("{{language}}", language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_prompts() {
        let prompts = ChroniclePrompts::default();
        assert!(prompts.system_instruction.contains("历史学家"));
        assert!(prompts.user_template.contains("{{localized_name}}"));
    }

    #[test]
    fn test_render_default_template() {
        let prompts = ChroniclePrompts::default();
        let message = prompts.render_user_message("Tang Dynasty", "唐朝", "简体中文");
        assert!(message.contains("唐朝（Tang Dynasty）"));
        assert!(message.contains("请以简体中文回复"));
        assert!(!message.contains("{{"));
    }

    #[test]
    fn test_load_from_project_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("system.txt"), "You are a tour guide.").unwrap();
        fs::write(temp.path().join("user.txt"), "Tell me about {{name}} in {{language}}.").unwrap();

        let prompts = ChroniclePrompts::load(Some(temp.path()), None);
        assert_eq!(prompts.system_instruction, "You are a tour guide.");
        assert_eq!(
            prompts.render_user_message("Song Dynasty", "宋朝", "English"),
            "Tell me about Song Dynasty in English."
        );
    }

    #[test]
    fn test_load_fallback_to_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        fs::write(project.path().join("system.txt"), "Project system").unwrap();
        fs::write(global.path().join("user.txt"), "Global: {{localized_name}}").unwrap();

        let prompts = ChroniclePrompts::load(Some(project.path()), Some(global.path()));
        assert_eq!(prompts.system_instruction, "Project system");
        assert_eq!(prompts.user_template, "Global: {{localized_name}}");
    }

    #[test]
    fn test_empty_file_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("system.txt"), "   \n").unwrap();

        let prompts = ChroniclePrompts::load(Some(temp.path()), None);
        assert_eq!(prompts, ChroniclePrompts::default());
    }
}
