use crate::domain::normalization::EXPENSE_FALLBACK_CATEGORY;

/// Instruction sent to the language model for one free-text transaction.
/// `categories` is the combined expense and income list.
pub fn build_prompt(text: &str, categories: &[String]) -> String {
    let category_list = categories.join(", ");

    format!(
        r#"You are a personal finance assistant. Extract a single transaction from the user's text and return it as strict JSON.

User text: "{text}"

Rules:
1. "type" must be "Income" or "Expense", inferred from context ("got my salary" -> Income, "bought coffee" -> Expense).
2. "amount" must be a bare integer with no currency symbol or suffix. Resolve shorthand to the full value ("50k" -> 50000, "1.5M" -> 1500000).
3. "description" is a short paraphrase of the user's text.
4. "category" MUST be chosen from this list: {category_list}. If nothing matches exactly, choose the closest match. If nothing is plausible, use "{fallback}".
5. Respond with the JSON object only. No prose, no markdown, no code fences.

Output format:
{{"type": "...", "amount": 0, "description": "...", "category": "..."}}"#,
        text = text.trim(),
        category_list = category_list,
        fallback = EXPENSE_FALLBACK_CATEGORY,
    )
}
