//! User interface implementations

#[cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::deps::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using console and indicatif
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Bold => style(message).bold().to_string(),
            MessageStyle::Cyan => style(message).cyan().to_string(),
            MessageStyle::Green => style(message).green().to_string(),
            MessageStyle::Red => style(message).red().to_string(),
            MessageStyle::Yellow => style(message).yellow().to_string(),
            MessageStyle::Warning => style(message).yellow().bold().to_string(),
            MessageStyle::Error => style(message).red().bold().to_string(),
            MessageStyle::Success => style(message).green().bold().to_string(),
        };
        println!("{styled}");
    }

    fn is_interactive(&self) -> bool {
        console::user_attended()
    }

    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use dialoguer::{Input, theme::ColorfulTheme};

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);

        if let Some(default_value) = default {
            input = input.default(default_value.to_string());
        }

        input
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to get input: {}", e))
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn enable_steady_tick(&self, duration: Duration) {
        self.pb.enable_steady_tick(duration);
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

// Test implementations for mocking

/// Test UI implementation that captures output
#[cfg(test)]
pub struct TestUserInterface {
    output: Arc<Mutex<Vec<String>>>,
    styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    prompt_response: Mutex<Option<String>>,
}

#[cfg(test)]
impl TestUserInterface {
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Vec::new())),
            styled_output: Arc::new(Mutex::new(Vec::new())),
            prompt_response: Mutex::new(None),
        }
    }

    /// Queue the answer returned by the next `prompt_input` call
    pub fn with_prompt_response(self, response: &str) -> Self {
        *self.prompt_response.lock().unwrap() = Some(response.to_string());
        self
    }

    pub fn get_output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        self.styled_output.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        Box::new(TestProgressIndicator)
    }

    fn print(&self, message: &str) {
        self.output.lock().unwrap().push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Mirror into the plain output for easier assertions
        self.styled_output
            .lock()
            .unwrap()
            .push((message.to_string(), style));
        self.output.lock().unwrap().push(message.to_string());
    }

    fn is_interactive(&self) -> bool {
        // Interactive whenever a prompt response is queued
        self.prompt_response.lock().unwrap().is_some()
    }

    fn prompt_input(&self, _prompt: &str, default: Option<&str>) -> Result<String> {
        Ok(self
            .prompt_response
            .lock()
            .unwrap()
            .clone()
            .or_else(|| default.map(String::from))
            .unwrap_or_default())
    }
}

#[cfg(test)]
struct TestProgressIndicator;

#[cfg(test)]
impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, _message: &str) {}

    fn enable_steady_tick(&self, _duration: Duration) {}

    fn finish_and_clear(&self) {}
}
