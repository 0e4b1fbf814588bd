use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqItem] = &[
    FaqItem {
        question: "How do I log my weight?",
        answer: "Open the weight page, pick a date and enter your weight in kilograms. Only one entry per date is kept.",
    },
    FaqItem {
        question: "Why was my weight entry rejected?",
        answer: "Both the date and a positive weight are required, and a date that already has an entry cannot be logged twice. Delete the old entry first.",
    },
    FaqItem {
        question: "How are calories counted?",
        answer: "Every food you log is added to the total for the day it was logged on. Deleting an entry removes it from the total.",
    },
    FaqItem {
        question: "Which workout types can I track?",
        answer: "Cardio, strength, flexibility and HIIT sessions, each with duration, calories burned and optional notes.",
    },
    FaqItem {
        question: "How is my daily calorie target calculated?",
        answer: "The goals calculator starts from 2000 calories and subtracts between 100 and 500 depending on your activity level.",
    },
    FaqItem {
        question: "Where is my data stored?",
        answer: "Everything stays in the local data directory of this app. Nothing is sent to any other service.",
    },
];

/// Items whose question or answer contains `term`, ignoring case.
pub fn search(term: &str) -> Vec<(usize, FaqItem)> {
    let needle = term.trim().to_lowercase();
    FAQ.iter()
        .copied()
        .enumerate()
        .filter(|(_, item)| {
            needle.is_empty()
                || item.question.to_lowercase().contains(&needle)
                || item.answer.to_lowercase().contains(&needle)
        })
        .collect()
}

/// At most one item is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaqAccordion {
    open: Option<usize>,
}

impl FaqAccordion {
    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn toggle(&mut self, index: usize) {
        self.open = if self.open == Some(index) { None } else { Some(index) };
    }
}
