pub const ENHANCE_SYSTEM: &str = include_str!("../data/prompts/enhance_system.txt");
pub const ENHANCE_USER: &str = include_str!("../data/prompts/enhance_user.txt");
const NEGATIVE: &str = include_str!("../data/prompts/negative.txt");

/// Output budget for an enhanced prompt (~200 words plus headroom).
pub const ENHANCE_MAX_TOKENS: u32 = 400;
pub const ENHANCE_TEMPERATURE: f32 = 0.7;

/// User turn asking the language model to enrich `prompt`.
pub fn enhance_request(prompt: &str) -> String {
    render(ENHANCE_USER, &[("prompt", prompt)])
}

/// Comma-separated artifacts the primary image model is asked to avoid.
pub fn negative_prompt() -> &'static str {
    NEGATIVE.trim()
}

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
