use crate::models::JournalEntry;

/// Concatenate qualifying entries in their original order.
pub fn journal_text(entries: &[JournalEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "Mood: {}\nEntry: {}",
                entry.mood.as_deref().unwrap_or("N/A"),
                entry.entry
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the weekly summary prompt for one user's qualifying entries.
pub fn build_summary_prompt(entries: &[JournalEntry]) -> String {
    format!(
        "You are an AI assistant that provides a compassionate and insightful summary \
         of a user's journal entries from the past week; do not include any introductory \
         message, give the summary directly. \
         Your response MUST be a single, clean HTML string. \
         Do not include any CSS, <style> tags, markdown, or the ```html wrapper. \
         Use only the following HTML tags: <p>, <strong>, <em>, <ul>, and <li>. \
         Highlight key themes, emotions, and potential insights. The summary should be \
         supportive and encouraging.\n\nJournal Entries:\n{}",
        journal_text(entries)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mood: Option<&str>, text: &str) -> JournalEntry {
        JournalEntry {
            date: None,
            mood: mood.map(str::to_string),
            entry: text.into(),
        }
    }

    #[test]
    fn entries_concatenate_in_order_with_blank_lines() {
        let text = journal_text(&[
            entry(Some("calm"), "Slept well."),
            entry(Some("anxious"), "Rough meeting."),
        ]);
        assert_eq!(
            text,
            "Mood: calm\nEntry: Slept well.\n\nMood: anxious\nEntry: Rough meeting."
        );
    }

    #[test]
    fn missing_mood_reads_as_not_available() {
        let text = journal_text(&[entry(None, "Just words.")]);
        assert!(text.starts_with("Mood: N/A\n"));
    }

    #[test]
    fn prompt_constrains_output_to_safe_html() {
        let prompt = build_summary_prompt(&[entry(Some("ok"), "fine")]);
        assert!(prompt.contains("<p>, <strong>, <em>, <ul>, and <li>"));
        assert!(prompt.contains("Journal Entries:\nMood: ok\nEntry: fine"));
    }
}
