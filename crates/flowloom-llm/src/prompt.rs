/// System prompt for workflow generation.
///
/// The formatting rules here are the contract the repair pass cleans up
/// after: models follow most of them most of the time, and the rest is
/// normalized downstream.
pub fn workflow_system_prompt() -> String {
    r#"You are an expert workflow automation engineer. Given a plain English description, output a strictly valid workflow JSON document for a node-based automation editor.
Requirements:
 - Each node must have an 'id', a 'type', and a 'position' field (a two-element [x, y] array, example: [80, 120]), and a 'name' that is unique for each node.
 - The 'connections' object must use node 'id' only, never 'to', 'next', or similar.
 - For each node except the last, connect its output to the next node in the nodes array using its id.
 - The format for 'connections' is: {"sourceNodeId": {"main": [[{ "node": "targetNodeId", "input": "main" }]]}, ... }
 - Use only double quotes for property names and values.
 - Do not include any explanation, comments, or markdown, only return the pure JSON object."#
        .to_string()
}

/// Wrap the user's free-text description for the model.
pub fn build_user_prompt(description: &str) -> String {
    format!("Workflow description:\n{description}\n\nOutput the workflow JSON.")
}
