//! Test case management commands

use std::sync::Arc;

use anyhow::Result;

use crate::api_client::types::{NewInstruction, NewTestCase, TestCase};
use crate::deps::{GatApiClient, MessageStyle, UserInterface};

/// Dependencies for the test case commands
pub struct TestCaseDependencies {
    /// User interface for output and confirmation prompts
    pub ui: Arc<dyn UserInterface>,
    /// API client for making requests to the GAT service
    pub api_client: Arc<dyn GatApiClient>,
}

/// Configuration for the create-test-case command
pub struct CreateTestCaseConfig {
    /// Application the test case belongs to
    pub application_id: String,
    /// Test case title
    pub title: String,
    /// Importance level (Low, Medium, Critical)
    pub importance: String,
    /// Optional section name
    pub section: Option<String>,
    /// Instruction texts in execution order
    pub instructions: Vec<String>,
}

/// Execute the list-test-cases command
pub async fn list_with_deps(
    application_id: &str,
    deps: &Arc<TestCaseDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;
    let test_cases = deps.api_client.test_cases(&application.id).await?;

    if test_cases.is_empty() {
        deps.ui.print_styled(
            &format!("No test cases found for application {}.", application.name),
            MessageStyle::Yellow,
        );
        return Ok(());
    }

    deps.ui.print("");
    for test_case in &test_cases {
        display_test_case(test_case, deps);
    }

    let count = test_cases.len();
    let plural = if count == 1 { "" } else { "s" };
    deps.ui.print(&format!("Total: {count} test case{plural}"));

    Ok(())
}

/// Execute the create-test-case command
///
/// Each instruction ending with a question mark becomes an assertion; an
/// instruction of the form `embedded_id=<test case id>` embeds an existing
/// test case.
pub async fn create_with_deps(
    config: CreateTestCaseConfig,
    deps: &Arc<TestCaseDependencies>,
) -> Result<()> {
    let application = deps
        .api_client
        .application_by_id(&config.application_id)
        .await?;

    let instructions = config
        .instructions
        .iter()
        .map(|text| parse_instruction(text))
        .collect();
    let new_test_case = NewTestCase {
        title: config.title,
        importance: Some(config.importance),
        section: config.section,
        instructions,
    };

    let created = deps
        .api_client
        .create_test_cases(&application.id, &[new_test_case])
        .await?;
    let Some(test_case) = created.first() else {
        anyhow::bail!("service returned no record for the created test case");
    };

    deps.ui.print_styled(
        &format!(
            "✓ Test case created for application {}",
            application.name
        ),
        MessageStyle::Success,
    );
    display_test_case(test_case, deps);

    Ok(())
}

/// Execute the delete-test-cases command
///
/// With explicit ids, deletes exactly those test cases. Without ids,
/// deletes ALL test cases of the application and asks for confirmation
/// first unless `--force` is given.
pub async fn delete_with_deps(
    application_id: &str,
    test_case_ids: &[String],
    force: bool,
    deps: &Arc<TestCaseDependencies>,
) -> Result<()> {
    let application = deps.api_client.application_by_id(application_id).await?;

    if test_case_ids.is_empty() {
        deps.ui.print_styled(
            &format!(
                "This deletes ALL test cases of application {}.",
                application.name
            ),
            MessageStyle::Warning,
        );

        if !force && deps.ui.is_interactive() {
            let prompt = format!("Type '{}' to confirm deletion", application.name);
            let input = deps.ui.prompt_input(&prompt, None)?;
            if input != application.name {
                deps.ui
                    .print_styled("Deletion cancelled.", MessageStyle::Yellow);
                return Ok(());
            }
        }

        deps.api_client.delete_all_test_cases(&application.id).await?;
        deps.ui.print_styled(
            &format!("✓ All test cases deleted for application {}", application.name),
            MessageStyle::Success,
        );
        return Ok(());
    }

    deps.api_client
        .delete_test_cases(&application.id, test_case_ids)
        .await?;
    deps.ui.print_styled(
        &format!("✓ Test cases deleted: {}", test_case_ids.join(" ")),
        MessageStyle::Success,
    );

    Ok(())
}

fn parse_instruction(text: &str) -> NewInstruction {
    match text.strip_prefix("embedded_id=") {
        Some(test_case_id) => NewInstruction::Embedded {
            test_case_id: test_case_id.to_string(),
        },
        None => NewInstruction::Step {
            content: text.to_string(),
            assertion: text.ends_with('?'),
        },
    }
}

fn display_test_case(test_case: &TestCase, deps: &Arc<TestCaseDependencies>) {
    deps.ui.print_styled(&test_case.title, MessageStyle::Bold);
    deps.ui.print(&format!("  ID:         {}", test_case.id));
    if let Some(importance) = &test_case.importance {
        deps.ui.print(&format!("  Importance: {importance}"));
    }
    if let Some(section) = &test_case.section {
        deps.ui.print(&format!("  Section:    {section}"));
    }
    for instruction in &test_case.instructions {
        let marker = if instruction.assertion { "?" } else { "-" };
        deps.ui
            .print(&format!("  {marker} {}", instruction.content));
    }
    deps.ui.print("");
}
