//! Keyword-pattern comment tagger
//!
//! Each tag category owns an ordered list of regex alternatives. The first
//! alternative that matches triggers the category, once. Escalation rules
//! then append implied tags.

use commentlens_core::{Error, Result, TagResult};
use regex::{Regex, RegexBuilder};
use tracing::info;

pub const HATE_SPEECH: &str = "Hate Speech";
pub const TOXICITY: &str = "Toxicity";
pub const SENSITIVE_TOPICS: &str = "Sensitive Topics";
pub const POTENTIAL_CONFLICT: &str = "Potential Conflict";

/// Tag taxonomy in evaluation order
const TAG_PATTERNS: &[(&str, &[&str])] = &[
    (
        "Product Praise",
        &[
            r"\b(love|great|amazing|awesome|fantastic|excellent|brilliant|perfect|wonderful|outstanding|superb|incredible|helpful|useful|beneficial|valuable|thanks|thank you|appreciate|grateful)\b",
            r"\b(best|favorite|top|outstanding|phenomenal|spectacular|marvelous|splendid|magnificent)\b",
        ],
    ),
    (
        "Feature Request",
        &[
            r"\b(i wish|can you add|would be better if|please include|please add|could you add|it would be great if|would love to see|hope you add|suggest adding)\b",
            r"\b(feature request|new feature|missing feature|add support for|implement|add option for)\b",
        ],
    ),
    (
        HATE_SPEECH,
        &[
            r"\b(kill yourself|die|hate you|you suck|you're stupid|you're dumb|you're an idiot|you're worthless|you're trash|you're garbage|you're useless|you're pathetic|you're a joke|you're a loser)\b",
            r"\b(fuck you|fuck off|go to hell|burn in hell|rot in hell|piece of shit|worthless piece of shit|stupid ass|dumb ass|idiot|moron|retard)\b",
        ],
    ),
    (
        "Feedback",
        &[
            r"\b(feedback|suggestion|improvement|constructive|criticism|advice|tip|recommendation|input|comment|thought|idea)\b",
            r"\b(could be better|needs improvement|suggest|recommend|consider|think about|maybe try|perhaps|might want to)\b",
        ],
    ),
    (
        "Confusion/Question",
        &[
            r"\?\n?$",
            r"\b(what|how|why|when|where|who|which|can you explain|i don't understand|confused|unclear|not sure|what's going on|how do i|what does this mean)\b",
            r"\b(help|clarify|explain|elaborate|what do you mean|i'm confused|not clear|unclear|puzzled)\b",
        ],
    ),
    (
        "Spam",
        &[
            r"\b(check out my|visit my|follow me|subscribe to my|my channel|my video|my content|my website|my blog|my instagram|my tiktok|my twitter)\b",
            r"\b(promote|advertisement|sponsored|paid|commission|affiliate|link in bio|click here|buy now|limited time|offer|deal|discount)\b",
            r"\b(bot|automated|script|program|algorithm|auto-generated|spam|repetitive|copied|duplicate)\b",
        ],
    ),
    (
        "Callout",
        &[
            r"\b(error|mistake|wrong|incorrect|false|misleading|inaccurate|false information|wrong info|not true|that's wrong|you're wrong|bug|glitch|problem|issue)\b",
            r"\b(misquote|misquoted|taken out of context|misinterpreted|misunderstood|misrepresented)\b",
        ],
    ),
    (
        "Timestamp Reference",
        &[
            r"\b(\d{1,2}:\d{2}|timestamp|at \d{1,2}:\d{2}|minute \d+|second \d+|\d+:\d+ had me|at \d+:\d+)\b",
            r"\b(time \d+:\d+|mark \d+:\d+|around \d+:\d+|near \d+:\d+|about \d+:\d+)\b",
        ],
    ),
    (
        "Requests/Ideas",
        &[
            r"\b(do a part 2|make another|next video|cover this|you have to check out|you should try|you need to see|you must visit|you have to go to|recommend|suggest|idea for|next time|in the future)\b",
            r"\b(restaurant|cafe|place|location|spot|venue|establishment|joint|eatery|dining|food|meal|dish|cuisine)\b",
        ],
    ),
    (
        "Praise for Creator",
        &[
            r"\b(you're amazing|you're awesome|you're great|you're the best|love your channel|love you|you're incredible|you're wonderful|you're fantastic|you're brilliant|you're perfect|you're outstanding)\b",
            r"\b(creator|youtuber|influencer|content creator|host|presenter|speaker|teacher|instructor|guide|mentor|role model)\b",
        ],
    ),
    (
        "Praise for Video",
        &[
            r"\b(this edit|this video|this content|this episode|this tutorial|this guide|this explanation|this demonstration|this presentation|this lesson|this class|this session)\b",
            r"\b(editing|production|quality|cinematography|filming|recording|audio|visual|graphics|effects|transitions|music|sound)\b",
        ],
    ),
    (
        "Community Interaction",
        &[
            r"\b(@\w+|tag|mention|reply to|respond to|answer|respond|reply|comment on|discuss|debate|conversation|dialogue|exchange)\b",
            r"\b(other video|another video|previous video|last video|next video|related video|similar video|check out|watch|see also|also see)\b",
        ],
    ),
    (
        "Inside Joke/Meme",
        &[
            r"\b(meme|joke|funny|hilarious|lol|lmao|rofl|haha|😂|😅|😆|😄|😁|😊|😋|😎|🤣|😭|😱|😤)\b",
            r"\b(reference|callback|throwback|nostalgia|remember when|good times|classic|legendary|iconic|famous|viral|trending)\b",
        ],
    ),
    (
        SENSITIVE_TOPICS,
        &[
            r"\b(politics|political|government|election|vote|democrat|republican|liberal|conservative|left|right|progressive|traditional)\b",
            r"\b(religion|religious|god|jesus|christ|bible|church|mosque|temple|prayer|faith|belief|spiritual|divine|holy|sacred)\b",
            r"\b(abortion|contraception|birth control|pregnancy|reproductive|pro-choice|pro-life|women's rights|gender|sexuality|lgbtq|transgender|non-binary)\b",
        ],
    ),
    (
        POTENTIAL_CONFLICT,
        &[
            r"\b(argument|debate|dispute|conflict|controversy|disagreement|opposition|rivalry|competition|fight|battle|war|attack|defend|defense|offensive|aggressive|hostile|angry|mad|furious|enraged)\b",
            r"\b(triggered|offended|upset|annoyed|irritated|frustrated|disappointed|disgusted|appalled|shocked|outraged|infuriated)\b",
        ],
    ),
    (
        TOXICITY,
        &[
            r"\b(toxic|poisonous|harmful|damaging|destructive|negative|hostile|aggressive|abusive|insulting|offensive|disrespectful|rude|mean|cruel|harsh|brutal|vicious|malicious|spiteful|hateful)\b",
            r"\b(trigger|triggered|snowflake|sensitive|easily offended|overreacting|dramatic|exaggerating|making a big deal|blowing things out of proportion)\b",
        ],
    ),
];

/// Escalations in application order: (trigger, implied)
const ESCALATIONS: &[(&str, &str)] = &[(HATE_SPEECH, TOXICITY), (SENSITIVE_TOPICS, POTENTIAL_CONFLICT)];

const DEFAULT_TAG_COLOR: &str = "bg-gray-100 text-gray-800";

struct TagRule {
    name: &'static str,
    patterns: Vec<Regex>,
}

pub struct TagClassifier {
    rules: Vec<TagRule>,
}

impl TagClassifier {
    /// Compile the tag taxonomy
    pub fn new() -> Result<Self> {
        let mut rules = Vec::with_capacity(TAG_PATTERNS.len());

        for &(name, patterns) in TAG_PATTERNS {
            let patterns = patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| {
                            Error::classifier(format!("Failed to compile pattern for tag {name}: {e}"))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            rules.push(TagRule { name, patterns });
        }

        info!("TagClassifier initialized with {} tags", rules.len());
        Ok(Self { rules })
    }

    /// Tag `text`
    pub fn tag(&self, text: &str) -> TagResult {
        let text_lower = text.to_lowercase();

        let mut tags: Vec<&str> = self
            .rules
            .iter()
            .filter(|rule| rule.patterns.iter().any(|p| p.is_match(&text_lower)))
            .map(|rule| rule.name)
            .collect();

        for &(trigger, implied) in ESCALATIONS {
            if tags.contains(&trigger) {
                tags.push(implied);
            }
        }

        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.iter().any(|t| t == tag) {
                unique.push(tag.to_string());
            }
        }

        TagResult::from_tags(unique)
    }

    /// Tag names in evaluation order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name)
    }

    /// CSS classes used to render a tag
    pub fn tag_color(tag: &str) -> &'static str {
        match tag {
            "Product Praise" => "bg-green-100 text-green-800",
            "Feature Request" => "bg-blue-100 text-blue-800",
            "Hate Speech" => "bg-red-100 text-red-800",
            "Feedback" => "bg-yellow-100 text-yellow-800",
            "Confusion/Question" => "bg-purple-100 text-purple-800",
            "Spam" => "bg-gray-100 text-gray-800",
            "Callout" => "bg-orange-100 text-orange-800",
            "Timestamp Reference" => "bg-indigo-100 text-indigo-800",
            "Requests/Ideas" => "bg-pink-100 text-pink-800",
            "Praise for Creator" => "bg-emerald-100 text-emerald-800",
            "Praise for Video" => "bg-teal-100 text-teal-800",
            "Community Interaction" => "bg-cyan-100 text-cyan-800",
            "Inside Joke/Meme" => "bg-violet-100 text-violet-800",
            "Sensitive Topics" => "bg-amber-100 text-amber-800",
            "Potential Conflict" => "bg-rose-100 text-rose-800",
            "Toxicity" => "bg-red-100 text-red-800",
            _ => DEFAULT_TAG_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_praise() {
        let tagger = TagClassifier::new().unwrap();
        let result = tagger.tag("I love this video, great job!");

        assert_eq!(result.primary_tag.as_deref(), Some("Product Praise"));
        assert!(result.contains("Praise for Video"));
        assert!(!result.contains(HATE_SPEECH));
    }

    #[test]
    fn test_hate_speech_escalates_to_toxicity() {
        let tagger = TagClassifier::new().unwrap();
        let result = tagger.tag("you're stupid, kill yourself");

        assert!(result.contains(HATE_SPEECH));
        assert!(result.contains(TOXICITY));
        assert_eq!(result.tags.last().map(String::as_str), Some(TOXICITY));
    }

    #[test]
    fn test_sensitive_topics_escalate_to_conflict() {
        let tagger = TagClassifier::new().unwrap();
        let result = tagger.tag("Keep politics out of it");

        assert_eq!(result.tags, vec![SENSITIVE_TOPICS, POTENTIAL_CONFLICT]);
        assert_eq!(result.tag_count, 2);
    }

    #[test]
    fn test_escalation_does_not_duplicate() {
        let tagger = TagClassifier::new().unwrap();
        // matches Hate Speech and Toxicity directly, then escalates
        let result = tagger.tag("idiot, you are so toxic");

        let toxicity_count = result.tags.iter().filter(|t| *t == TOXICITY).count();
        assert_eq!(toxicity_count, 1);
        assert_eq!(result.tag_count, result.tags.len());
    }

    #[test]
    fn test_question_mark_at_end() {
        let tagger = TagClassifier::new().unwrap();
        assert!(tagger.tag("Is this real?").contains("Confusion/Question"));
        assert!(tagger.tag("Is this real?\n").contains("Confusion/Question"));
    }

    #[test]
    fn test_timestamp_reference() {
        let tagger = TagClassifier::new().unwrap();
        assert!(tagger.tag("3:45 had me crying").contains("Timestamp Reference"));
    }

    #[test]
    fn test_no_tags() {
        let tagger = TagClassifier::new().unwrap();
        let result = tagger.tag("ok");

        assert!(result.tags.is_empty());
        assert_eq!(result.primary_tag, None);
    }

    #[test]
    fn test_tag_color() {
        assert_eq!(TagClassifier::tag_color("Hate Speech"), "bg-red-100 text-red-800");
        assert_eq!(TagClassifier::tag_color("Unknown"), DEFAULT_TAG_COLOR);
    }

    #[test]
    fn test_every_tag_has_a_color() {
        let tagger = TagClassifier::new().unwrap();
        for name in tagger.tag_names().filter(|n| *n != "Spam") {
            assert_ne!(TagClassifier::tag_color(name), DEFAULT_TAG_COLOR, "{name}");
        }
    }
}
