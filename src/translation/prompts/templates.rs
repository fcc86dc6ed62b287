/*!
 * Prompt templates for SQL generation.
 *
 * The instruction template pins the exact table and column names of the
 * library schema; the model is trusted to follow it.
 */

/// Instruction template for the library schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with a `{user_query}` placeholder
    template: String,
}

impl PromptTemplate {
    /// Placeholder substituted with the user's question
    pub const USER_QUERY: &'static str = "{user_query}";

    /// The default instruction template for the library database.
    pub const LIBRARY_SQL: &'static str = "You are a SQL expert for a library database. Strictly follow these rules:
1. Use EXACT table/column names from schema:
   - books: [book_id, title, author, isbn, publication_year, genre]
   - inventory: [inventory_id, book_id, status, last_checkout, due_date]
2. ALWAYS use explicit JOIN syntax:
   - books.book_id = inventory.book_id
3. Table names MUST be: 'books' and 'inventory' (NEVER modify these names)
4. Select relevant columns from BOTH tables when joining
5. Use exact string matches: WHERE author = 'George Orwell'
6. Return raw SQL ONLY, no explanations

User question: {user_query}
SQL:";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default library template.
    pub fn library_sql() -> Self {
        Self::new(Self::LIBRARY_SQL)
    }

    /// Render the template for one question.
    pub fn render(&self, user_query: &str) -> String {
        self.template.replace(Self::USER_QUERY, user_query)
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::library_sql()
    }
}

/// Build the text-to-SQL prompt: dialect rules, schema context, then the question.
pub fn build_sql_prompt(dialect: &str, schema_context: &str, question: &str) -> String {
    format!(
        "Given an input question, create a syntactically correct {dialect} query to run. \
Only use the tables and columns listed below; pay attention to which column is in which table.\n\
{schema_context}\n\n\
Question: {question}\n\
SQLQuery: "
    )
}
