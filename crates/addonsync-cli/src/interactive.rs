//! Interactive prompting before destructive operations

use std::io::{self, Write};
use std::path::Path;

use addonsync_core::{AddonError, OverwriteApprover};
use dialoguer::console::Term;

/// Answer to an overwrite question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    /// Overwrite this archive
    Yes,
    /// Keep this archive
    No,
    /// Overwrite this and all remaining archives
    All,
}

impl OverwriteChoice {
    /// Map a pressed key to a choice; Enter means yes
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'y' | 'Y' | '\n' | '\r' => Some(Self::Yes),
            'n' | 'N' => Some(Self::No),
            'a' | 'A' => Some(Self::All),
            _ => None,
        }
    }
}

/// Session state for "all" answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionDecision {
    /// Ask for each archive
    AskEach,
    /// Overwrite all remaining archives
    ApproveAll,
}

/// Asks before an existing archive is replaced
pub struct OverwritePrompter {
    session_state: SessionDecision,
}

impl OverwritePrompter {
    /// Create a prompter; `yes_all` approves everything without asking
    #[must_use]
    pub const fn new(yes_all: bool) -> Self {
        Self {
            session_state: if yes_all {
                SessionDecision::ApproveAll
            } else {
                SessionDecision::AskEach
            },
        }
    }

    /// Ask whether `archive` may be overwritten
    ///
    /// # Errors
    ///
    /// Returns an error if terminal interaction fails.
    pub fn prompt(&mut self, archive: &Path) -> addonsync_core::Result<bool> {
        if self.session_state == SessionDecision::ApproveAll {
            return Ok(true);
        }

        let file_name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        println!("\n{file_name} already exists.");

        let choice = Self::show_prompt().map_err(|e| AddonError::io(archive, e))?;
        Ok(self.apply(choice))
    }

    /// Record `choice` and return whether to overwrite
    pub fn apply(&mut self, choice: OverwriteChoice) -> bool {
        match choice {
            OverwriteChoice::Yes => true,
            OverwriteChoice::No => false,
            OverwriteChoice::All => {
                self.session_state = SessionDecision::ApproveAll;
                true
            }
        }
    }

    fn show_prompt() -> io::Result<OverwriteChoice> {
        let term = Term::stderr();

        print!("Overwrite? [Y/n/a] (yes/no/all): ");
        io::stdout().flush()?;

        loop {
            let key = term.read_char()?;
            println!("{key}");

            if let Some(choice) = OverwriteChoice::from_key(key) {
                return Ok(choice);
            }
            print!("Invalid key. Press y/n/a: ");
            io::stdout().flush()?;
        }
    }

    /// Box this prompter as a packager overwrite approver
    #[must_use]
    pub fn into_approver(mut self) -> OverwriteApprover {
        Box::new(move |archive| self.prompt(archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_all_skips_prompt() {
        let mut prompter = OverwritePrompter::new(true);

        assert!(prompter.prompt(Path::new("tool (v1.0.0).zip")).unwrap());
    }

    #[test]
    fn test_approver_with_yes_all() {
        let mut approve = OverwritePrompter::new(true).into_approver();

        assert!(approve(Path::new("a.zip")).unwrap());
        assert!(approve(Path::new("b.zip")).unwrap());
    }

    #[test]
    fn test_all_answer_approves_remaining_archives() {
        let mut prompter = OverwritePrompter::new(false);

        assert!(!prompter.apply(OverwriteChoice::No));
        assert_eq!(prompter.session_state, SessionDecision::AskEach);
        assert!(prompter.apply(OverwriteChoice::Yes));
        assert_eq!(prompter.session_state, SessionDecision::AskEach);

        assert!(prompter.apply(OverwriteChoice::All));
        assert_eq!(prompter.session_state, SessionDecision::ApproveAll);
        // no terminal needed once everything is approved
        assert!(prompter.prompt(Path::new("a.zip")).unwrap());
        assert!(prompter.prompt(Path::new("b.zip")).unwrap());
    }

    #[test]
    fn test_choice_from_key() {
        assert_eq!(OverwriteChoice::from_key('y'), Some(OverwriteChoice::Yes));
        assert_eq!(OverwriteChoice::from_key('\n'), Some(OverwriteChoice::Yes));
        assert_eq!(OverwriteChoice::from_key('N'), Some(OverwriteChoice::No));
        assert_eq!(OverwriteChoice::from_key('a'), Some(OverwriteChoice::All));
        assert_eq!(OverwriteChoice::from_key('x'), None);
    }
}
