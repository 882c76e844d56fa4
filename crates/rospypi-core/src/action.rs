//! Action to message expansion.
//!
//! An `.action` file holds three sections (goal, result, feedback) separated
//! by lines starting with `---`. The generation engine only understands plain
//! messages, so every action is expanded into the three section messages plus
//! the four envelope messages that action clients and servers exchange.

use std::fs;
use std::path::{Path, PathBuf};

use rospypi_schema::SchemaKind;

use crate::error::SchemaError;

const SECTION_SEPARATOR: &str = "---";
const SECTION_COUNT: usize = 3;

/// One parsed `<Name>.action` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSchema {
    pub name: String,
    pub goal: String,
    pub result: String,
    pub feedback: String,
}

impl ActionSchema {
    /// Split `text` into its goal, result and feedback sections.
    ///
    /// Sections are kept byte-for-byte (blank lines and a trailing newline
    /// included); the separator lines themselves are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ActionSections`] unless there are exactly two
    /// separator lines.
    pub fn parse(name: &str, text: &str, path: &Path) -> Result<Self, SchemaError> {
        let mut sections: Vec<Vec<&str>> = vec![Vec::new()];
        for line in text.split('\n') {
            if line.starts_with(SECTION_SEPARATOR) {
                sections.push(Vec::new());
                continue;
            }
            if let Some(current) = sections.last_mut() {
                current.push(line);
            }
        }

        let [goal, result, feedback]: [Vec<&str>; SECTION_COUNT] =
            sections
                .try_into()
                .map_err(|found: Vec<Vec<&str>>| SchemaError::ActionSections {
                    path: path.to_path_buf(),
                    found: found.len(),
                })?;

        Ok(Self {
            name: name.to_string(),
            goal: goal.join("\n"),
            result: result.join("\n"),
            feedback: feedback.join("\n"),
        })
    }

    /// The seven message files this action expands to, as
    /// `(type name, file contents)`.
    pub fn messages(&self) -> Vec<(String, String)> {
        let name = &self.name;
        vec![
            (format!("{name}Goal"), self.goal.clone()),
            (format!("{name}Result"), self.result.clone()),
            (format!("{name}Feedback"), self.feedback.clone()),
            (
                format!("{name}Action"),
                format!(
                    "{name}ActionGoal action_goal\n\
                     {name}ActionResult action_result\n\
                     {name}ActionFeedback action_feedback\n"
                ),
            ),
            (
                format!("{name}ActionGoal"),
                format!("Header header\nactionlib_msgs/GoalID goal_id\n{name}Goal goal\n"),
            ),
            (
                format!("{name}ActionResult"),
                format!("Header header\nactionlib_msgs/GoalStatus status\n{name}Result result\n"),
            ),
            (
                format!("{name}ActionFeedback"),
                format!(
                    "Header header\nactionlib_msgs/GoalStatus status\n{name}Feedback feedback\n"
                ),
            ),
        ]
    }
}

/// Expand every `action/*.action` file of a message module into `msg/`.
///
/// All action files are parsed before anything is written, so a malformed
/// file leaves `msg/` untouched. Returns the written message paths; empty
/// when the module has no actions.
///
/// # Errors
///
/// Returns [`SchemaError::ActionSections`] for a malformed action file and
/// [`SchemaError::Io`] if a file cannot be read or written.
pub fn expand(module_dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    let action_dir = module_dir.join(SchemaKind::Action.dir_name());
    let sources = list_action_files(&action_dir)?;
    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let mut actions = Vec::with_capacity(sources.len());
    for path in &sources {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(path)?;
        actions.push(ActionSchema::parse(name, &text, path)?);
    }

    let msg_dir = module_dir.join(SchemaKind::Msg.dir_name());
    fs::create_dir_all(&msg_dir)?;

    let mut written = Vec::new();
    for action in &actions {
        for (type_name, contents) in action.messages() {
            let target = msg_dir.join(format!("{type_name}.{}", SchemaKind::Msg.extension()));
            fs::write(&target, contents)?;
            written.push(target);
        }
        tracing::debug!(action = %action.name, "expanded action into messages");
    }

    Ok(written)
}

fn list_action_files(action_dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    if !action_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(action_dir)? {
        let path = entry?.path();
        let is_action = path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(SchemaKind::Action.extension());
        if is_action {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
