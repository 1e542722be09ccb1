//! Browser steps for the product administration page

use cucumber::gherkin::Step;
use cucumber::{then, when};

use catalog_e2e::{E2eError, E2eResult};

use super::CatalogWorld;

#[when(expr = "I visit the {string}")]
async fn visit(world: &mut CatalogWorld, page: String) -> E2eResult<()> {
    world.ctx()?.visit(&page).await
}

#[then(expr = "I should see {string} in the title")]
async fn title_contains(world: &mut CatalogWorld, text: String) -> E2eResult<()> {
    world.ctx()?.assert_title_contains(&text).await
}

#[then(expr = "I should not see {string}")]
async fn page_lacks(world: &mut CatalogWorld, text: String) -> E2eResult<()> {
    world.ctx()?.assert_page_lacks(&text).await
}

#[when(expr = "I set the {string} to {string}")]
async fn set_field(world: &mut CatalogWorld, field: String, value: String) -> E2eResult<()> {
    world.ctx()?.set_field(&field, &value).await
}

#[when(expr = "I change {string} to {string}")]
async fn change_field(world: &mut CatalogWorld, field: String, value: String) -> E2eResult<()> {
    world.ctx()?.set_field(&field, &value).await
}

#[when(expr = "I select {string} in the {string} dropdown")]
async fn select_option(world: &mut CatalogWorld, option: String, dropdown: String) -> E2eResult<()> {
    world.ctx()?.select_option(&dropdown, &option).await
}

#[when(expr = "I press the {string} button")]
async fn press_button(world: &mut CatalogWorld, button: String) -> E2eResult<()> {
    world.ctx()?.press_button(&button).await
}

#[then(expr = "I should see the message {string}")]
async fn message(world: &mut CatalogWorld, text: String) -> E2eResult<()> {
    world.ctx()?.assert_message(&text).await
}

#[when(expr = "I copy the {string} field")]
async fn copy_field(world: &mut CatalogWorld, field: String) -> E2eResult<()> {
    world.ctx_mut()?.copy_field(&field).await
}

#[when(expr = "I paste the {string} field")]
async fn paste_field(world: &mut CatalogWorld, field: String) -> E2eResult<()> {
    world.ctx()?.paste_field(&field).await
}

#[then(expr = "the {string} field should be empty")]
async fn field_empty(world: &mut CatalogWorld, field: String) -> E2eResult<()> {
    world.ctx()?.assert_field_empty(&field).await
}

#[then(expr = "I should see {string} in the {string} field")]
async fn field_value(world: &mut CatalogWorld, text: String, field: String) -> E2eResult<()> {
    world.ctx()?.assert_field_value(&field, &text).await
}

#[then(expr = "I should see {string} in the {string} dropdown")]
async fn dropdown_value(world: &mut CatalogWorld, text: String, dropdown: String) -> E2eResult<()> {
    world.ctx()?.assert_dropdown(&dropdown, &text).await
}

#[then(expr = "I should see {string} in the results")]
async fn in_results(world: &mut CatalogWorld, name: String) -> E2eResult<()> {
    world.ctx()?.assert_in_results(&name).await
}

#[then(expr = "I should not see {string} in the results")]
async fn not_in_results(world: &mut CatalogWorld, name: String) -> E2eResult<()> {
    world.ctx()?.assert_not_in_results(&name).await
}

#[then("I should see the following products in the results")]
async fn all_in_results(world: &mut CatalogWorld, step: &Step) -> E2eResult<()> {
    let table = step
        .table
        .as_ref()
        .ok_or_else(|| E2eError::AssertionFailed("step has no product table".to_string()))?;
    world.ctx()?.assert_results_table(&table.rows).await
}

#[when(expr = "I save a screenshot as {string}")]
async fn screenshot(world: &mut CatalogWorld, name: String) -> E2eResult<()> {
    world.ctx()?.save_screenshot(&name).await?;
    Ok(())
}
