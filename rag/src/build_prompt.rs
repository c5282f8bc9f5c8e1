use crate::history::Turn;

/// A named block of the prompt sent to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Persona(String),
    Retrieved(Vec<String>),
    History(Vec<Turn>),
    Question(String),
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Persona(_) => "persona",
            Section::Retrieved(_) => "retrieved",
            Section::History(_) => "history",
            Section::Question(_) => "question",
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Section::Persona(text) | Section::Question(text) => text.trim().is_empty(),
            Section::Retrieved(snippets) => snippets.is_empty(),
            Section::History(turns) => turns.is_empty(),
        }
    }

    fn render(&self) -> String {
        match self {
            Section::Persona(text) => text.trim().to_string(),
            Section::Retrieved(snippets) => format!("RETRIEVED INFORMATION:\n{}", snippets.join("\n")),
            Section::History(turns) => turns
                .iter()
                .map(|t| format!("{}: {}", t.role, t.text))
                .collect::<Vec<_>>()
                .join("\n"),
            Section::Question(text) => format!("Customer: {}", text),
        }
    }
}

/// Ordered prompt sections. Text is produced only by [`Prompt::render`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prompt {
    sections: Vec<Section>,
}

impl Prompt {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Joins the non-empty sections with newlines.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(Section::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collects the parts of a turn's prompt and always emits them in the order
/// persona, retrieved information, history, question.
#[derive(Clone, Debug, Default)]
pub struct PromptBuilder {
    persona: Option<String>,
    retrieved: Vec<String>,
    history: Vec<Turn>,
    question: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn retrieved<I, S>(mut self, snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retrieved = snippets.into_iter().map(Into::into).collect();
        self
    }

    pub fn history(mut self, turns: &[Turn]) -> Self {
        self.history = turns.to_vec();
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn build(self) -> Prompt {
        let mut sections = Vec::with_capacity(4);
        if let Some(persona) = self.persona {
            sections.push(Section::Persona(persona));
        }
        sections.push(Section::Retrieved(self.retrieved));
        sections.push(Section::History(self.history));
        if let Some(question) = self.question {
            sections.push(Section::Question(question));
        }
        Prompt { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;

    fn turn(role: Role, text: &str) -> Turn {
        Turn {
            role,
            text: text.to_string(),
        }
    }

    #[test]
    fn renders_sections_in_order() {
        let history = [
            turn(Role::User, "What is the range?"),
            turn(Role::Assistant, "Up to 507 km."),
        ];
        let prompt = PromptBuilder::new()
            .question("And charging?")
            .history(&history)
            .retrieved(["Range: 507 km", "DC charging 10-80% in 18 min"])
            .persona("\n  You are a sales consultant.\n")
            .build();

        let names: Vec<&str> = prompt.sections().iter().map(Section::name).collect();
        assert_eq!(names, vec!["persona", "retrieved", "history", "question"]);
        assert_eq!(
            prompt.render(),
            "You are a sales consultant.\n\
             RETRIEVED INFORMATION:\nRange: 507 km\nDC charging 10-80% in 18 min\n\
             User: What is the range?\n\
             Assistant: Up to 507 km.\n\
             Customer: And charging?"
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let prompt = PromptBuilder::new()
            .persona("Persona")
            .retrieved(Vec::<String>::new())
            .question("Hello")
            .build();
        assert_eq!(prompt.render(), "Persona\nCustomer: Hello");
        assert_eq!(prompt.sections()[1], Section::Retrieved(vec![]));
    }

    #[test]
    fn long_content_is_not_truncated() {
        let snippet = "x".repeat(100_000);
        let prompt = PromptBuilder::new().retrieved([snippet.clone()]).question("q").build();
        assert!(prompt.render().contains(&snippet));
    }
}
