//! In-memory [`SeedStore`] used by tests and `seed --dry-run`.

use crate::store::{
    IngredientRecord, NewIngredient, NewRecipe, NewUser, RecipeIngredientLink, SeedStore,
    StoreCounts,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredStep {
    pub recipe_id: i64,
    pub step_number: i32,
    pub text: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, NewUser>,
    categories: BTreeMap<i64, String>,
    ingredients: BTreeMap<i64, IngredientRecord>,
    recipes: BTreeMap<i64, NewRecipe>,
    links: BTreeMap<i64, Vec<RecipeIngredientLink>>,
    steps: Vec<StoredStep>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn ingredient_by_name(&self, name: &str) -> Option<&IngredientRecord> {
        let wanted = name.to_lowercase();
        self.ingredients
            .values()
            .find(|ingredient| ingredient.name.to_lowercase() == wanted)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingredient links of a recipe, in insertion order
    pub async fn recipe_links(&self, recipe_id: i64) -> Vec<RecipeIngredientLink> {
        let state = self.state.lock().await;
        state.links.get(&recipe_id).cloned().unwrap_or_default()
    }

    /// Steps of a recipe ordered by step number
    pub async fn recipe_steps(&self, recipe_id: i64) -> Vec<StoredStep> {
        let state = self.state.lock().await;
        let mut steps: Vec<StoredStep> = state
            .steps
            .iter()
            .filter(|step| step.recipe_id == recipe_id)
            .cloned()
            .collect();
        steps.sort_by_key(|step| step.step_number);
        steps
    }

    pub async fn ingredient(&self, id: i64) -> Option<IngredientRecord> {
        self.state.lock().await.ingredients.get(&id).cloned()
    }

    pub async fn recipe(&self, id: i64) -> Option<NewRecipe> {
        self.state.lock().await.recipes.get(&id).cloned()
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn upsert_ingredient_category(&self, name: &str) -> Result<i64> {
        let mut state = self.state.lock().await;
        if let Some((id, _)) = state.categories.iter().find(|(_, n)| n.as_str() == name) {
            return Ok(*id);
        }
        let id = state.allocate_id();
        state.categories.insert(id, name.to_string());
        Ok(id)
    }

    async fn upsert_ingredient(&self, ingredient: &NewIngredient) -> Result<IngredientRecord> {
        let mut state = self.state.lock().await;
        if let Some(category_id) = ingredient.category_id {
            if !state.categories.contains_key(&category_id) {
                bail!("Unknown ingredient category id {}", category_id);
            }
        }

        let existing = state
            .ingredient_by_name(&ingredient.name)
            .map(|existing| (existing.id, existing.name.clone()));
        let (id, name) = match existing {
            Some(found) => found,
            None => (state.allocate_id(), ingredient.name.clone()),
        };
        let record = IngredientRecord {
            id,
            name,
            category_id: ingredient.category_id,
            default_unit: ingredient.default_unit.clone(),
            default_qty: ingredient.default_qty,
            price_rsd: ingredient.price_rsd,
        };
        state.ingredients.insert(id, record.clone());
        Ok(record)
    }

    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<IngredientRecord>> {
        let state = self.state.lock().await;
        Ok(state.ingredient_by_name(name).cloned())
    }

    async fn create_ingredient(&self, name: &str) -> Result<IngredientRecord> {
        let mut state = self.state.lock().await;
        if state.ingredient_by_name(name).is_some() {
            bail!("Ingredient '{}' already exists", name);
        }
        let id = state.allocate_id();
        let record = IngredientRecord {
            id,
            name: name.to_string(),
            category_id: None,
            default_unit: None,
            default_qty: None,
            price_rsd: None,
        };
        state.ingredients.insert(id, record.clone());
        Ok(record)
    }

    async fn upsert_user(&self, user: &NewUser) -> Result<i64> {
        let mut state = self.state.lock().await;
        let existing = state
            .users
            .iter()
            .find(|(_, u)| u.email == user.email)
            .map(|(id, _)| *id);
        let id = match existing {
            Some(id) => id,
            None => state.allocate_id(),
        };
        state.users.insert(id, user.clone());
        Ok(id)
    }

    async fn delete_recipes_by_author(&self, author_id: i64) -> Result<u64> {
        let mut state = self.state.lock().await;
        let doomed: Vec<i64> = state
            .recipes
            .values()
            .filter(|recipe| recipe.author_id == author_id)
            .map(|recipe| recipe.id)
            .collect();

        for id in &doomed {
            state.recipes.remove(id);
            state.links.remove(id);
        }
        state.steps.retain(|step| !doomed.contains(&step.recipe_id));
        Ok(doomed.len() as u64)
    }

    async fn recipe_author(&self, recipe_id: i64) -> Result<Option<i64>> {
        let state = self.state.lock().await;
        Ok(state.recipes.get(&recipe_id).map(|recipe| recipe.author_id))
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&recipe.author_id) {
            bail!("Unknown recipe author id {}", recipe.author_id);
        }
        if state.recipes.contains_key(&recipe.id) {
            bail!("Recipe id {} is already taken", recipe.id);
        }
        state.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe.id)
    }

    async fn replace_recipe_ingredients(
        &self,
        recipe_id: i64,
        links: &[RecipeIngredientLink],
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.recipes.contains_key(&recipe_id) {
            bail!("Unknown recipe id {}", recipe_id);
        }
        for (index, link) in links.iter().enumerate() {
            if !state.ingredients.contains_key(&link.ingredient_id) {
                bail!("Unknown ingredient id {}", link.ingredient_id);
            }
            if links[..index]
                .iter()
                .any(|other| other.ingredient_id == link.ingredient_id)
            {
                bail!(
                    "Ingredient {} linked twice to recipe {}",
                    link.ingredient_id,
                    recipe_id
                );
            }
        }
        state.links.insert(recipe_id, links.to_vec());
        Ok(())
    }

    async fn replace_recipe_steps(&self, recipe_id: i64, steps: &[String]) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.recipes.contains_key(&recipe_id) {
            bail!("Unknown recipe id {}", recipe_id);
        }
        state.steps.retain(|step| step.recipe_id != recipe_id);
        for (index, text) in steps.iter().enumerate() {
            state.steps.push(StoredStep {
                recipe_id,
                step_number: index as i32 + 1,
                text: text.clone(),
            });
        }
        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let state = self.state.lock().await;
        Ok(StoreCounts {
            users: state.users.len() as i64,
            categories: state.categories.len() as i64,
            ingredients: state.ingredients.len() as i64,
            recipes: state.recipes.len() as i64,
            recipe_ingredients: state.links.values().map(|l| l.len() as i64).sum(),
            steps: state.steps.len() as i64,
        })
    }
}
