//! Tips shown under the search field
//!
//! `tip` cycles to the next tip, `tip add <text>` and `tip rm <n>` edit the
//! list, `tip hide` closes the panel. The list is stored as a JSON array in
//! the `tips` setting and starts out with a few hints about the page itself.

use chrono::{Datelike, Utc};

use startpage_storage::Database;

use crate::collaborators::TipOps;
use crate::error::CoreError;
use crate::Result;

const TIPS_KEY: &str = "tips";

const BUILTIN_TIPS: &[&str] = &[
    "Press / to search, or just start typing a bookmark key",
    "Type !gh followed by a space to search GitHub",
    "Type :3000 to open http://localhost:3000",
    "touch <name> <url> adds a bookmark to the current folder",
    "mkdir <folder> creates a folder, mv <name> <folder> moves into it",
    "Press ; and a folder key to enter that folder, ; - to go back up",
    "Press space and a folder key to open every bookmark in it",
    "Press . to open everything in the current folder",
    "Press ? then c for commands, s for shortcuts, x to close",
];

pub struct TipManager {
    db: Database,
    tips: Vec<String>,
    /// Index of the tip on display
    current: Option<usize>,
}

impl TipManager {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            tips: BUILTIN_TIPS.iter().map(|tip| tip.to_string()).collect(),
            current: None,
        }
    }

    /// Read the stored tip list; the built-in list is used until one is saved
    pub fn load(&mut self) -> Result<()> {
        if let Some(json) = self.db.setting(TIPS_KEY)? {
            self.tips = serde_json::from_str(&json)?;
        }
        tracing::debug!(count = self.tips.len(), "Tips loaded");
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.tips)?;
        self.db.put_setting(TIPS_KEY, &json)?;
        Ok(())
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }

    fn show(&mut self, index: Option<usize>) -> Option<String> {
        self.current = index.filter(|&i| i < self.tips.len());
        self.current.map(|i| self.tips[i].clone())
    }

    /// Same tip all day, a different one tomorrow
    fn tip_of_the_day(&self, day: usize) -> Option<usize> {
        (!self.tips.is_empty()).then(|| day % self.tips.len())
    }

    fn next(&mut self) -> Option<String> {
        if self.tips.is_empty() {
            return self.show(None);
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.tips.len());
        self.show(Some(next))
    }

    fn add(&mut self, words: &[String]) -> Result<Option<String>> {
        let text = words.join(" ");
        if text.trim().is_empty() {
            return Err(CoreError::Usage("tip add <text>"));
        }

        self.tips.push(text);
        self.save()?;
        tracing::info!(count = self.tips.len(), "Tip added");
        Ok(self.show(Some(self.tips.len() - 1)))
    }

    fn remove(&mut self, number: Option<&String>) -> Result<Option<String>> {
        let number = number
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or(CoreError::Usage("tip rm <number>"))?;

        if number == 0 || number > self.tips.len() {
            return Err(CoreError::Tip(format!(
                "no tip number {number}, there are {}",
                self.tips.len()
            )));
        }

        let removed = self.tips.remove(number - 1);
        self.save()?;
        tracing::info!(tip = %removed, "Tip removed");

        let current = self.current.filter(|&i| i != number - 1).map(|i| {
            if i > number - 1 {
                i - 1
            } else {
                i
            }
        });
        Ok(self.show(current))
    }
}

impl TipOps for TipManager {
    fn generate(&mut self) -> Result<Option<String>> {
        let day = Utc::now().ordinal0() as usize;
        let index = self.tip_of_the_day(day);
        Ok(self.show(index))
    }

    fn handle(&mut self, args: &[String]) -> Result<Option<String>> {
        match args.first().map(String::as_str) {
            None | Some("next") => Ok(self.next()),
            Some("add") => self.add(&args[1..]),
            Some("rm") => self.remove(args.get(1)),
            Some("hide") => Ok(self.show(None)),
            Some(other) => Err(CoreError::Tip(format!(
                "unknown tip command '{other}', expected next, add, rm or hide"
            ))),
        }
    }
}
