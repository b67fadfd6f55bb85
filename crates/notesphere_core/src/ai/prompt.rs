//! Request content and instruction template.

use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder replaced by the note content.
pub const NOTE_CONTENT_PLACEHOLDER: &str = "{{noteContent}}";

/// Built-in instruction template (Spanish output, `ideas` schema).
pub const DEFAULT_TEMPLATE: &str = r#"Eres un asistente experto. Analiza la nota y genera ideas útiles y accionables: sugerencias, comandos, ejemplos de sintaxis o conceptos relacionados.

Contenido de la Nota:
{{noteContent}}

CASO 1: la nota es solo un término en "Título" (por ejemplo "kubectl" o "marketing digital") y "Objetivo" y "Notas" están vacíos o son genéricos.
- Responde como si te preguntaran directamente por ese término.
- Genera entre 2 y 5 ideas informativas: definición, ejemplos de uso o comandos comunes, conceptos relacionados, buenas prácticas.
- Nunca devuelvas una lista vacía ni digas que la nota está completa.

CASO 2: la nota tiene contenido en "Objetivo" y/o "Notas".
- Genera entre 2 y 5 ideas que amplíen, mejoren o complementen la nota.
- Puedes incluir fragmentos de código, líneas de comando, consejos de sintaxis o temas para explorar.

Formato obligatorio para ambos casos: un objeto JSON con la clave "ideas", un array de objetos con "title" (string), "details" (string, admite Markdown) y opcionalmente "type" (string, por ejemplo "Comando" o "Fragmento de Código").
Responde completamente en español. Si el tema es técnico, incluye ejemplos en bloques de código Markdown.
"#;

static DIRECT_QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Título: [^\n]+(\nObjetivo:\s*\nNotas:\s*)?$").expect("valid direct query regex")
});

/// Concatenates the note's text fields with their labels.
pub fn build_note_content(note: &Note) -> String {
    format!(
        "Título: {}\nObjetivo: {}\nNotas: {}",
        note.title, note.objective, note.notes_area
    )
}

/// True when the content is only a title, i.e. a bare term lookup.
pub fn is_direct_query(note_content: &str) -> bool {
    DIRECT_QUERY_RE.is_match(note_content.trim())
}

/// Instruction template treated as configuration data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Wraps a custom template; `None` when the placeholder is missing.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        text.contains(NOTE_CONTENT_PLACEHOLDER)
            .then_some(Self { text })
    }

    pub fn render(&self, note_content: &str) -> String {
        self.text.replace(NOTE_CONTENT_PLACEHOLDER, note_content)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::NoteId;

    fn note(title: &str, objective: &str, notes_area: &str) -> Note {
        Note {
            id: NoteId::new("24050101"),
            title: title.to_string(),
            objective: objective.to_string(),
            notes_area: notes_area.to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            is_pinned: false,
            images: Vec::new(),
        }
    }

    #[test]
    fn bare_term_builds_labelled_content() {
        let content = build_note_content(&note("kubectl", "", ""));
        assert_eq!(content, "Título: kubectl\nObjetivo: \nNotas: ");
        assert!(is_direct_query(&content));
    }

    #[test]
    fn elaborate_note_is_not_a_direct_query() {
        let content = build_note_content(&note("kubectl", "deploy apps", "rollout steps"));
        assert!(!is_direct_query(&content));
    }

    #[test]
    fn template_requires_placeholder() {
        assert!(PromptTemplate::new("no placeholder").is_none());
        let template = PromptTemplate::new("Nota: {{noteContent}}").unwrap();
        assert_eq!(template.render("x"), "Nota: x");
        assert!(PromptTemplate::default().render("abc").contains("abc"));
    }
}
