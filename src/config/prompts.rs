//! Prompt templates for Shortsmith.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub script: ScriptPrompts,
    pub timeline: TimelinePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt for short-form script writing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    /// Instructions placed ahead of the topic.
    pub instruction: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            instruction: r#"You are a seasoned content writer for a YouTube Shorts channel that publishes facts videos.
Each short lasts less than 50 seconds (about 140 words) and is engaging and original.
When the user asks for a kind of facts short, you write it.

For example, if the user asks for:
Weird facts
You would write something like:

Weird facts you don't know:
- Bananas are berries, but strawberries aren't.
- A single cloud can weigh over a million pounds.
- There's a species of jellyfish that is biologically immortal.
- Honey never spoils; pots found in ancient Egyptian tombs are still edible.
- Octopuses have three hearts and blue blood.

Keep it brief, highly interesting, and unique.

Output only a parsable JSON object with the key 'script'.

# Output
{"script": "Here is the script ..."}
"#
            .to_string(),
        }
    }
}

/// Prompts for keyword timeline extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePrompts {
    pub system: String,
    pub user: String,
}

impl Default for TimelinePrompts {
    fn default() -> Self {
        Self {
            system: r#"# Instructions

Given a video script and its timed captions, extract three visually concrete and specific keywords for each time segment. The keywords are used to search for background videos, so they should be short and capture the essence of the sentence. They may be synonyms or related terms. If a caption is vague, look at the next caption for context. If a keyword is a single word, prefer a two-word keyword that is visually concrete. If a time frame holds two or more important ideas, split it into shorter time frames. Time periods must be strictly consecutive and cover the entire length of the video. Each keyword should cover 2-4 seconds.

Respond in JSON like this: [[[t1, t2], ["keyword1", "keyword2", "keyword3"]], [[t2, t3], ["keyword4", "keyword5", "keyword6"]], ...]

Guidelines:
- Use only English in your queries.
- Each query must depict something visual, like 'rainy street' or 'cat sleeping'.
- 'emotional moment' is BAD (not visually concrete); 'crying child' is GOOD.
- ['Car', 'Car driving', 'Car racing', 'Car parked'] is BAD (too many strings); ['Fast car'] is GOOD.
- ['Un chien', 'une voiture rapide'] is BAD (must be English).

Reply with the JSON only, no extra text."#
                .to_string(),

            user: "Script: {{script}}\nTimed Captions: {{captions}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }

            let timeline_path = custom_path.join("timeline.toml");
            if timeline_path.exists() {
                let content = std::fs::read_to_string(&timeline_path)?;
                prompts.timeline = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are resolved in one pass over the template, so substituted
    /// values are inserted verbatim even when they contain `{{name}}` text.
    /// Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.script.instruction.contains("'script'"));
        assert!(prompts.timeline.user.contains("{{captions}}"));
    }

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("script".to_string(), "Cats sleep a lot.".to_string());
        vars.insert("captions".to_string(), "[[[0,1],\"Cats\"]]".to_string());

        let result = Prompts::render(&TimelinePrompts::default().user, &vars);
        assert_eq!(result, "Script: Cats sleep a lot.\nTimed Captions: [[[0,1],\"Cats\"]]");
    }

    #[test]
    fn test_substituted_values_not_rescanned() {
        let mut vars = HashMap::new();
        vars.insert("script".to_string(), "Use {{captions}} and {{channel}}".to_string());
        vars.insert("captions".to_string(), "[[[0,2],\"cat\"]]".to_string());
        vars.insert("channel".to_string(), "Daily Facts".to_string());

        let result = Prompts::render("{{script}} | {{captions}} | {{missing}}", &vars);
        assert_eq!(
            result,
            "Use {{captions}} and {{channel}} | [[[0,2],\"cat\"]] | {{missing}}"
        );
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("channel".to_string(), "Daily Facts".to_string());
        custom.insert("script".to_string(), "ignored".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("script".to_string(), "used".to_string());

        let result = prompts.render_with_custom("{{channel}}: {{script}}", &vars);
        assert_eq!(result, "Daily Facts: used");
    }

    #[test]
    fn test_custom_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("script.toml"),
            "instruction = \"Write about {{channel}}.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.script.instruction, "Write about {{channel}}.");
        assert!(prompts.timeline.system.contains("visually concrete"));
    }
}
