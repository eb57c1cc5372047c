/// Build the moderation prompt for one post.
pub fn build_moderation_prompt(title: &str, content: &str) -> String {
    let context = format!("Title: {title}\n\n, Content: {content}");
    format!(
        "You are a content moderation assistant for a mental health app called MindSpace. \
         Analyze the following post and determine if it violates community guidelines \
         (Hate Speech, Harassment, Spam, Self-Harm, Misinformation). \
         Your response MUST be a single, valid JSON object with the following structure: \
         {{\"isFlagged\": boolean, \"reason\": \"string\", \"severity\": \"string\"}}. \
         \"isFlagged\" should be true if it violates any guideline. \
         \"reason\" should be one of: \"Hate Speech\", \"Harassment\", \"Spam\", \
         \"Self-Harm\", \"Misinformation\", or \"None\". \
         \"severity\" should be one of: \"Low\", \"Medium\", \"High\", or \"None\".\n\n\
         Analyze this content: '{context}'"
    )
}
