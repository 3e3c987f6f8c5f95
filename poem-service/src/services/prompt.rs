//! Prompt construction for poem generation.
//!
//! Request fields are interpolated as given: no escaping, no truncation.

use crate::models::PoemRequest;

/// Build the full instruction text sent to the model for one request.
pub fn build_prompt(request: &PoemRequest) -> String {
    format!(
        r#"
YOU ARE AN EXPERT POET AND A MASTER OF FORM. YOUR TASK IS TO WRITE ONE ORIGINAL, VIVID AND CAREFULLY STRUCTURED POEM THAT MATCHES EVERY REQUIREMENT BELOW EXACTLY.

### INSTRUCTIONS:
1. THE POEM MUST BE ABOUT THIS THEME AND NOTHING ELSE: {theme}.
2. THE POEM MUST HAVE EXACTLY {length} PARAGRAPHS/STANZAS, NOT ONE MORE AND NOT ONE LESS.
3. THE POEM MUST FOLLOW THE RHYME SCHEME {rhyme_scheme} EXACTLY AND CONSISTENTLY IN EVERY STANZA.
4. THE POEM MUST BE WRITTEN IN THE STYLE OF {poet_style}, CAPTURING THEIR TONE, DICTION AND IMAGERY.
5. THE POEM MUST BEGIN WITH A FITTING TITLE.

### HOW TO APPROACH IT:
- ANALYZE the theme ({theme}) and decide which emotions, images and ideas belong to it.
- INTERNALIZE how {poet_style} writes: their voice, vocabulary, rhythm and figurative language.
- STRUCTURE the poem as exactly {length} paragraphs/stanzas and apply the rhyme scheme ({rhyme_scheme}) line by line.
- CHECK that the finished poem is coherent, creative and engaging while honoring every constraint.

### WHAT NOT TO DO:
- DO NOT WRITE MORE OR FEWER THAN {length} PARAGRAPHS/STANZAS.
- DO NOT BREAK THE RHYME SCHEME ({rhyme_scheme}) ANYWHERE.
- DO NOT DRIFT AWAY FROM THE STYLE OF {poet_style}.
- DO NOT WANDER FROM THE THEME ({theme}) OR ADD UNRELATED IDEAS.
- DO NOT PRODUCE GENERIC, CLICHED OR LOW-QUALITY VERSE.

### OUTPUT:
WRITE THE TITLE FOLLOWED BY THE POEM, AND NOTHING ELSE.
"#,
        theme = request.theme,
        length = request.length,
        rhyme_scheme = request.rhyme_scheme,
        poet_style = request.poet_style,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autumn() -> PoemRequest {
        PoemRequest {
            theme: "autumn".to_string(),
            length: "3".to_string(),
            rhyme_scheme: "ABAB".to_string(),
            poet_style: "Keats".to_string(),
        }
    }

    #[test]
    fn embeds_every_field() {
        let prompt = build_prompt(&autumn());
        assert!(prompt.contains("THEME AND NOTHING ELSE: autumn."));
        assert!(prompt.contains("EXACTLY 3 PARAGRAPHS/STANZAS"));
        assert!(prompt.contains("RHYME SCHEME ABAB EXACTLY"));
        assert!(prompt.contains("IN THE STYLE OF Keats"));
        assert!(prompt.contains("FITTING TITLE"));
    }

    #[test]
    fn sections_appear_in_order() {
        let prompt = build_prompt(&autumn());
        let positions: Vec<usize> = [
            "YOU ARE AN EXPERT POET",
            "### INSTRUCTIONS:",
            "### HOW TO APPROACH IT:",
            "### WHAT NOT TO DO:",
            "### OUTPUT:",
        ]
        .iter()
        .map(|marker| prompt.find(marker).expect(marker))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn negative_constraints_repeat_each_field() {
        let prompt = build_prompt(&autumn());
        let (_, tail) = prompt.split_once("### WHAT NOT TO DO:").unwrap();
        for needle in ["3 PARAGRAPHS", "(ABAB)", "Keats", "(autumn)", "LOW-QUALITY"] {
            assert!(tail.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn user_text_is_passed_through_untouched() {
        let request = PoemRequest {
            theme: "{braces} \"quotes\" <tags>\nnewline".to_string(),
            ..autumn()
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("{braces} \"quotes\" <tags>\nnewline"));
    }
}
