//! LLM prompt engineering for profile extraction

/// Builds prompts for the LLM to extract an investor profile
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instruction and target object
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. The text to analyze, quoted
        prompt.push_str(&format!("Text to analyze: \"{}\"\n\n", self.text));

        // 3. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// JSON Schema for the profile object, used for schema-constrained output
pub fn profile_json_schema() -> &'static str {
    PROFILE_JSON_SCHEMA
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze this text and extract the following details as a valid JSON object:
{
    "age": <integer>,
    "budget": <decimal number with optional cents>,
    "start_date": <YYYY-MM-DD>,
    "end_date": <YYYY-MM-DD>,
    "avoid": <text description>,
    "salary": <decimal number if present>
}"#;

const OUTPUT_FORMAT_REMINDER: &str = "Return ONLY the JSON object with double quotes, nothing else.";

const PROFILE_JSON_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "age": {"type": "integer"},
    "budget": {"type": "number"},
    "start_date": {"type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$"},
    "end_date": {"type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$"},
    "avoid": {"type": "string"},
    "salary": {"type": "number"}
  },
  "required": ["age", "budget", "start_date", "end_date", "avoid", "salary"]
}"#;
