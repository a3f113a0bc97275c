#[cfg(test)]
mod tests {
    use sastojci::ingredient_model::{ParsedIngredient, Unit};
    use sastojci::ingredient_parser::{canonicalize_name, parse_ingredient_line, parse_ingredient_lines};
    use sastojci::seed_data::SeedData;

    fn single(line: &str) -> ParsedIngredient {
        let parsed = parse_ingredient_line(line);
        assert_eq!(parsed.ingredients.len(), 1, "line {:?}: {:?}", line, parsed);
        parsed.ingredients.into_iter().next().unwrap()
    }

    #[test]
    fn test_meat_with_alternatives() {
        let ingredient = single("600g mesa (junetina/svinjetina)");
        assert_eq!(ingredient.name, "meso");
        assert_eq!(ingredient.quantity, 600.0);
        assert_eq!(ingredient.unit, Unit::Gram);
    }

    #[test]
    fn test_bare_count() {
        let ingredient = single("1 avokado");
        assert_eq!(ingredient.name, "avokado");
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.unit, Unit::Piece);

        let ingredient = single("2 jaja");
        assert_eq!(ingredient.name, "jaje");
        assert_eq!(ingredient.quantity, 2.0);
        assert_eq!(ingredient.unit, Unit::Piece);
    }

    #[test]
    fn test_seasoning_pair() {
        let parsed = parse_ingredient_line("So, biber");
        let names: Vec<&str> = parsed.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["so", "biber"]);
        for ingredient in &parsed.ingredients {
            assert_eq!(ingredient.quantity, 1.0);
            assert_eq!(ingredient.unit, Unit::Piece);
        }
    }

    #[test]
    fn test_legumes_in_genitive() {
        let ingredient = single("200g pasulja");
        assert_eq!(ingredient.name, "pasulj");
        assert_eq!(ingredient.quantity, 200.0);
        assert_eq!(ingredient.unit, Unit::Gram);
    }

    #[test]
    fn test_unknown_unit_word_is_kept() {
        let ingredient = single("3 čena belog luka");
        assert_eq!(ingredient.name, "beli luk");
        assert_eq!(ingredient.quantity, 3.0);
        assert_eq!(ingredient.unit, Unit::Other("čena".to_string()));
        assert_eq!(ingredient.unit.as_str(), "čena");
    }

    #[test]
    fn test_ground_meat_wins_over_everything() {
        let ingredient = single("500g mlevenog mesa (mešano)");
        assert_eq!(ingredient.name, "mleveno meso");
        assert_eq!(ingredient.unit, Unit::Gram);
        assert_eq!(canonicalize_name("Mlevenog   MESA"), "mleveno meso");
    }

    #[test]
    fn test_footnote_after_dash_is_dropped() {
        let ingredient = single("Sok od limuna — po ukusu");
        assert_eq!(ingredient.name, "limun");
        assert_eq!(ingredient.quantity, 1.0);
    }

    #[test]
    fn test_descriptive_prefixes() {
        assert_eq!(single("300g file lososa").name, "losos");
        assert_eq!(single("2 kriške hleba").name, "hleb");
        assert_eq!(single("1 konzerva paradajza (pelat)").name, "paradajz");
        assert_eq!(single("3 glavice crnog luka").name, "luk");
    }

    #[test]
    fn test_empty_and_punctuation_only_lines() {
        assert!(parse_ingredient_line("").ingredients.is_empty());
        assert!(parse_ingredient_line(" , ,, ").ingredients.is_empty());

        let parsed = parse_ingredient_line("So, ()");
        assert_eq!(parsed.parsed_count(), 1);
        assert_eq!(parsed.skipped, vec!["()".to_string()]);
    }

    #[test]
    fn test_lines_keep_their_order() {
        let lines = ["2 jaja", "300 ml mleka", "200g brašna"];
        let parsed = parse_ingredient_lines(&lines);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].line, "2 jaja");
        assert_eq!(parsed[1].ingredients[0].name, "mleko");
        assert_eq!(parsed[1].ingredients[0].unit, Unit::Milliliter);
        assert_eq!(parsed[2].ingredients[0].name, "brašno");
    }

    #[test]
    fn test_parsed_line_serializes_units_as_strings() {
        let parsed = parse_ingredient_line("2 kašike ulja");
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["ingredients"][0]["name"], "ulje");
        assert_eq!(json["ingredients"][0]["quantity"], 2.0);
        assert_eq!(json["ingredients"][0]["unit"], "kašika");
    }

    #[test]
    fn test_every_builtin_line_yields_ingredients() {
        let data = SeedData::builtin().unwrap();
        for recipe in &data.recipes {
            for line in &recipe.ingredients {
                let parsed = parse_ingredient_line(line);
                assert!(
                    !parsed.ingredients.is_empty(),
                    "recipe {} line {:?} parsed to nothing",
                    recipe.id,
                    line
                );
                for ingredient in &parsed.ingredients {
                    assert!(ingredient.quantity > 0.0);
                    assert!(!ingredient.name.is_empty());
                }
            }
        }
    }
}
