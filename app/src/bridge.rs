//! JSON-lines event bridge
//!
//! One event per input line, one reply per output line. The frontend stays
//! stateless: it forwards DOM events and applies the returned view and
//! navigations.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use startpage_core::{Focus, Key, KeyOutcome, Navigation, PageView, RecordingNavigator, StartPage};

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SearchKeydown {
        key: Key,
        #[serde(default)]
        value: String,
    },
    ShortcutsInput {
        value: String,
    },
    DocumentKeydown {
        key: Key,
        #[serde(default)]
        focus: Focus,
    },
    BeforeUnload,
    UnloadCancelled,
}

#[derive(Debug, Serialize)]
pub struct Reply<'a> {
    pub prevent_default: bool,
    pub view: &'a PageView,
    pub navigations: Vec<Navigation>,
}

pub struct Bridge {
    page: StartPage,
    navigator: RecordingNavigator,
}

impl Bridge {
    /// `navigator` must share its log with the one the page navigates through
    pub fn new(page: StartPage, navigator: RecordingNavigator) -> Self {
        Self { page, navigator }
    }

    pub fn handle(&mut self, event: Event) -> Reply<'_> {
        tracing::debug!(?event, "Event");

        let outcome = match event {
            Event::SearchKeydown { key, value } => self.page.search_keydown(&key, &value),
            Event::ShortcutsInput { value } => {
                self.page.shortcuts_input(&value);
                KeyOutcome::PASS
            }
            Event::DocumentKeydown { key, focus } => self.page.document_keydown(&key, focus),
            Event::BeforeUnload => {
                self.page.before_unload();
                KeyOutcome::PASS
            }
            Event::UnloadCancelled => {
                self.page.unload_cancelled();
                KeyOutcome::PASS
            }
        };

        self.reply(outcome)
    }

    fn reply(&self, outcome: KeyOutcome) -> Reply<'_> {
        Reply {
            prevent_default: outcome.prevent_default,
            view: self.page.view(),
            navigations: self.navigator.take(),
        }
    }

    /// Initialize the page, write its first view, then answer events until
    /// the input ends
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        self.page.initialize();
        serde_json::to_writer(&mut output, &self.reply(KeyOutcome::PASS))?;
        writeln!(output)?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Event>(&line) {
                Ok(event) => serde_json::to_writer(&mut output, &self.handle(event))?,
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed event");
                    serde_json::to_writer(
                        &mut output,
                        &serde_json::json!({ "error": e.to_string() }),
                    )?;
                }
            }
            writeln!(output)?;
            output.flush()?;
        }

        tracing::info!("Input closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use startpage_core::{Config, Database};

    fn bridge() -> Bridge {
        let navigator = RecordingNavigator::new();
        let page = StartPage::with_database(
            &Config::new("/unused".into()),
            Database::open_in_memory().unwrap(),
            Box::new(navigator.clone()),
        )
        .unwrap();
        Bridge::new(page, navigator)
    }

    fn run(lines: &[&str]) -> Vec<Value> {
        let mut output = Vec::new();
        bridge()
            .run(lines.join("\n").as_bytes(), &mut output)
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_events() {
        let event: Event =
            serde_json::from_str(r#"{"event":"search_keydown","key":"Enter","value":"cats"}"#)
                .unwrap();
        assert!(matches!(
            event,
            Event::SearchKeydown { key: Key::Enter, ref value } if value == "cats"
        ));

        let event: Event = serde_json::from_str(r#"{"event":"document_keydown","key":"?"}"#).unwrap();
        assert!(matches!(
            event,
            Event::DocumentKeydown { key: Key::Char('?'), focus: Focus::None }
        ));

        let event: Event = serde_json::from_str(r#"{"event":"before_unload"}"#).unwrap();
        assert!(matches!(event, Event::BeforeUnload));
    }

    #[test]
    fn test_search_round() {
        let replies = run(&[
            r#"{"event":"search_keydown","key":"Enter","value":"example.com"}"#,
        ]);

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["view"]["shortcuts"]["focused"], true);
        assert_eq!(replies[1]["prevent_default"], false);
        assert_eq!(
            replies[1]["navigations"],
            serde_json::json!([{ "mode": "replace", "url": "https://example.com" }])
        );
    }

    #[test]
    fn test_document_keys_update_view() {
        let replies = run(&[
            r#"{"event":"document_keydown","key":"?","focus":"shortcuts"}"#,
            r#"{"event":"shortcuts_input","value":"s"}"#,
        ]);

        assert_eq!(replies[1]["prevent_default"], true);
        assert_eq!(replies[1]["view"]["context_label"], "?");
        assert_eq!(replies[2]["view"]["context_label"], "");
        assert_eq!(replies[2]["view"]["panels"]["shortcuts"], true);
    }

    #[test]
    fn test_malformed_line_gets_error() {
        let replies = run(&["not json", "", r#"{"event":"unload_cancelled"}"#]);

        assert_eq!(replies.len(), 3);
        assert!(replies[1]["error"].is_string());
        assert_eq!(replies[2]["prevent_default"], false);
    }
}
