//! Fixed texts sent by the dialogue engine.

pub const HANDOFF_ACK: &str = "Got it! I'll pass your request to a specialist.";
pub const NAME_PROMPT: &str = "Please enter your name for the request.";
pub const EMAIL_PROMPT: &str = "Thank you! Now please provide your email.";
pub const EMAIL_INVALID: &str = "That doesn't look like an email. Please enter a valid address.";
pub const PHONE_PROMPT: &str = "Great! Please write your phone number.";
pub const PHONE_INVALID: &str =
    "That doesn't look like a phone number. Please enter a valid number.";
pub const QUESTION_PROMPT: &str = "One last thing: please describe your problem or question.";
pub const LEAD_CREATED: &str =
    "Thank you! We have received your request. A specialist will contact you soon.";
pub const LEAD_FAILED: &str =
    "Sorry, something went wrong and your request was not saved. Please try again later.";
pub const CANCELLED: &str = "Dialogue cancelled.";
pub const UNKNOWN_COMMAND: &str =
    "Unknown command. Use /help to reach a specialist or /cancel to stop.";

pub fn greeting(display_name: &str) -> String {
    format!(
        "Hello, {}! I'm your virtual assistant.\n\n\
         You can ask me your question and I'll try to answer. \
         If you need a specialist, just say so or use the /help command.",
        display_name
    )
}

pub fn handoff() -> String {
    format!("{}\n\n{}", HANDOFF_ACK, NAME_PROMPT)
}
