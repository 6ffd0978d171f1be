//! LLM prompts for verification, extraction and keyword analysis

/// Builds the prompts sent for one target author
///
/// The author name is embedded verbatim; the model is told to match it
/// exactly.
pub struct PromptBuilder {
    author: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
        }
    }

    /// Strict yes/no question: is the author credited in this image?
    pub fn verification(&self) -> String {
        VERIFICATION_TEMPLATE.replace("{author}", &self.author)
    }

    /// Request for the author's verbatim content as `{"content": [...]}`
    pub fn extraction(&self) -> String {
        EXTRACTION_TEMPLATE.replace("{author}", &self.author)
    }
}

/// System prompt asking for `count` distinctive keywords
pub fn keyword_prompt(count: usize) -> String {
    KEYWORD_TEMPLATE.replace("{count}", &count.to_string())
}

/// System prompt for website suggestions
pub fn website_system_prompt() -> &'static str {
    WEBSITE_SYSTEM_PROMPT
}

/// User message for website suggestions
pub fn website_user_prompt(article: &str, keywords: &[String]) -> String {
    format!(
        "ARTICLE:\n\n{}\n\nKEYWORDS:\n\n{}\n",
        article,
        keywords.join(", ")
    )
}

const VERIFICATION_TEMPLATE: &str = r#"You check whether a specific person wrote any of the content shown in a screenshot.

Target author: "{author}"

Steps:
1. Read all text in the image.
2. Look for "{author}" shown as the author of some content: a username or handle beside a post, a byline, a reply label, or any explicit attribution.
3. Do not guess from similar or partial names. Only an exact match of "{author}" counts.

Answer with a single word:
- yes: "{author}" is clearly shown as an author
- no: otherwise

Do not explain."#;

const EXTRACTION_TEMPLATE: &str = r#"You extract text written by one specific person from a screenshot of forum posts, comments, social media or blog content.

Target author: "{author}"

Steps:
1. Confirm that "{author}" appears as a username, handle, byline or attribution label. Do not infer it.
2. Collect every piece of text directly attributed to "{author}": their posts, comments, replies or messages.
3. Copy that text verbatim. Leave out anything written by other people, including quoted replies.
4. If nothing is attributed to "{author}", return an empty list.

Respond with a JSON object only, in exactly this shape:
{"content": ["first piece of text by {author}", "second piece of text by {author}"]}

When nothing is found:
{"content": []}"#;

const KEYWORD_TEMPLATE: &str = r#"You are an open-source intelligence investigator.

From the article below, extract distinctive fingerprints of the author's writing: unusual keywords and short phrases that would help find other texts by the same person through web search.

Return exactly {count} short terms of one to three words each.

Prefer:
- slang, colloquialisms, regional expressions and stylistic quirks
- emotionally loaded or opinionated vocabulary
- niche phrases or metaphors the author repeats
- rare idioms or invented wording
- acronyms, names or references specific to a region or subculture

Avoid:
- technical or academic terms used in their ordinary sense
- generic, neutral or encyclopedic vocabulary
- full sentences or explanations

Respond with a JSON object only:
{"keywords": ["keyword1", "keyword2", "keyword3"]}"#;

const WEBSITE_SYSTEM_PROMPT: &str = r#"You are a digital open-source intelligence analyst.

Given an article and keywords that capture the author's style, suggest websites or platforms where searching those keywords is most likely to surface more writing by the same author.

Consider:
- blogs, personal domains and writing platforms
- forums and community sites
- social networks
- niche communities suggested by the article's subject

Respond with a JSON object only, using search-operator form:
{"sites": ["site:reddit.com", "site:medium.com"]}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_prompt_names_author() {
        let prompt = PromptBuilder::new("kopi_uncle88").verification();
        assert!(prompt.contains("Target author: \"kopi_uncle88\""));
        assert!(prompt.contains("yes"));
        assert!(!prompt.contains("{author}"));
    }

    #[test]
    fn test_extraction_prompt_requests_content_array() {
        let prompt = PromptBuilder::new("alice").extraction();
        assert!(prompt.contains("\"content\""));
        assert!(prompt.contains("alice"));
        assert!(!prompt.contains("{author}"));
    }

    #[test]
    fn test_prompts_differ_per_stage() {
        let builder = PromptBuilder::new("alice");
        assert_ne!(builder.verification(), builder.extraction());
    }

    #[test]
    fn test_keyword_prompt_includes_count() {
        let prompt = keyword_prompt(7);
        assert!(prompt.contains("exactly 7 short terms"));
    }

    #[test]
    fn test_website_user_prompt_joins_keywords() {
        let prompt = website_user_prompt("some text", &["lah".to_string(), "shiok".to_string()]);
        assert!(prompt.contains("some text"));
        assert!(prompt.contains("lah, shiok"));
    }
}
