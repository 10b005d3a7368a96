//! Travel-assistant system prompt rendering.
//!
//! ```rust
//! use wchat::{ChatContext, render_system_prompt};
//!
//! let prompt = render_system_prompt(&ChatContext::default().with_destination("Chengdu"));
//! assert!(prompt.contains("- Destination: Chengdu"));
//! assert!(prompt.contains("- Trip length (days): not set"));
//! ```

use std::fmt::Write;

const NOT_SET: &str = "not set";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatContext {
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub days: Option<u32>,
}

impl ChatContext {
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }
}

pub fn render_system_prompt(context: &ChatContext) -> String {
    let destination = non_blank(context.destination.as_deref());
    let start_date = non_blank(context.start_date.as_deref());
    let days = context
        .days
        .filter(|days| *days > 0)
        .map(|days| days.to_string());

    let mut prompt = String::from(
        "You are CloudTravel, an intelligent travel assistant that helps users plan trips.\n\n",
    );
    prompt.push_str("Current context:\n");
    let _ = writeln!(prompt, "- Destination: {}", destination.unwrap_or(NOT_SET));
    let _ = writeln!(prompt, "- Start date: {}", start_date.unwrap_or(NOT_SET));
    let _ = writeln!(
        prompt,
        "- Trip length (days): {}",
        days.as_deref().unwrap_or(NOT_SET)
    );
    prompt.push_str(
        "\nBased on the user's needs, provide:\n\
         1. Travel guide suggestions\n\
         2. Flight and train ticket lookups\n\
         3. Weather information\n\
         4. Itinerary planning\n\
         5. Packing lists\n\n\
         Answers should be friendly, specific and practical. Reply in Chinese.",
    );
    prompt
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
