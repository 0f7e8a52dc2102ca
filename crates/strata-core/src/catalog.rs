//! Built-in verticals.

use crate::{
  Error, Result,
  hierarchy::{FieldSpec, LevelSpec, VerticalSpec},
};

fn text(name: &str) -> FieldSpec { FieldSpec::text(name) }

fn int(name: &str) -> FieldSpec { FieldSpec::integer(name) }

/// A root level whose only business field is a unique `name`.
fn named_root(table: &str, segment: &str) -> LevelSpec {
  LevelSpec::new(table, segment).field(text("name").unique())
}

/// A child level with a unique `name` and a parent column.
fn named_child(table: &str, segment: &str, parent: &str) -> LevelSpec {
  LevelSpec::new(table, segment).parent(parent).field(text("name").unique())
}

fn leaf(
  table: &str,
  segment: &str,
  parent: &str,
  fields: impl IntoIterator<Item = FieldSpec>,
) -> LevelSpec {
  fields
    .into_iter()
    .fold(LevelSpec::new(table, segment).parent(parent), LevelSpec::field)
}

fn vertical(name: &str, root: LevelSpec, child: LevelSpec, leaf: LevelSpec) -> VerticalSpec {
  VerticalSpec { name: name.to_owned(), root, child, leaf }
}

/// Every built-in vertical, in mount order.
pub fn all() -> Vec<VerticalSpec> {
  vec![
    vertical(
      "news",
      LevelSpec::new("news_channels", "channels")
        .field(text("name").unique())
        .field(text("created_at").optional()),
      named_child("news_sections", "sections", "channel_id"),
      leaf("channel_articles", "articles", "section_id", [
        text("title").unique(),
        text("date"),
        text("content"),
        text("created_at").optional(),
      ]),
    ),
    vertical(
      "delivery",
      named_root("delivery_service", "services"),
      named_child("store", "stores", "service_id"),
      leaf("orders", "orders", "store_id", [text("title"), text("date"), int("amount")]),
    ),
    vertical(
      "delivers",
      named_root("delivers_services", "services"),
      named_child("couriers", "couriers", "deliver_service_id"),
      leaf("courier_orders", "orders", "courier_id", [
        text("name"),
        text("date"),
        text("time"),
        text("address"),
        text("delivery_time"),
        int("total_weight"),
        int("items"),
        int("total_amount"),
      ]),
    ),
    vertical(
      "cars",
      named_root("car_models", "models"),
      named_child("catalog_sections", "sections", "car_model_id"),
      leaf("spare_parts", "parts", "catalog_section_id", [
        text("name"),
        text("catalog_number"),
        text("producer"),
        int("price"),
        int("weight"),
        text("description"),
        int("availability_count"),
        text("create_date"),
      ]),
    ),
    vertical(
      "flights",
      named_root("flight_directions", "directions"),
      named_child("flight_datetime", "datetime", "flight_id"),
      leaf("flight_tickets", "tickets", "datetime_id", [
        text("flight_number"),
        int("cost"),
        int("occupancy"),
        int("total_seats"),
        text("departure_airport"),
        text("arrival_airport"),
        text("departure_time"),
        text("arrival_time"),
      ]),
    ),
    vertical(
      "industrial",
      named_root("industrial_stores", "stores"),
      named_child("industrial_departments", "departments", "store_id"),
      leaf("industrial_products", "products", "department_id", [
        text("name"),
        text("item_number"),
        int("weight"),
        int("price"),
        text("producer"),
        text("description"),
        text("packing_date"),
      ]),
    ),
    vertical(
      "maintenance",
      named_root("maintenance_stations", "stations"),
      named_child("maintenance_workers", "workers", "station_id"),
      leaf("maintenance_works", "works", "worker_id", [
        text("work_type"),
        text("brand"),
        text("number"),
        text("date"),
        text("mechanic_name"),
        text("description"),
        int("cost"),
        int("duration"),
      ]),
    ),
    vertical(
      "olympic",
      named_root("olympic_games", "games"),
      named_child("competition_types", "competitions", "game_id"),
      leaf("olympic_players", "players", "competition_id", [
        text("name"),
        text("country"),
        int("ranking"),
        text("score"),
        int("age"),
        text("sport"),
        int("height"),
        int("weight"),
      ]),
    ),
    vertical(
      "multiprofile",
      named_root("multiprofile_olymp", "tasks"),
      named_child("profiles", "profiles", "olymp_task_id"),
      leaf("olymp_participants", "participants", "olymp_profile_id", [
        text("full_name"),
        int("qualification_score"),
        int("final_score"),
        text("hobbies"),
        text("country"),
        text("school"),
        text("achievements"),
        text("additional_information"),
      ]),
    ),
    vertical(
      "pharmacy",
      named_root("pharmacies", "pharmacies"),
      named_child("medication_groups", "groups", "pharmacy_id"),
      leaf("medications", "medications", "medication_group_id", [
        text("name"),
        text("dosage"),
        text("volume"),
        int("price"),
        text("producer"),
        text("expiration_date"),
        text("description"),
        text("effects"),
      ]),
    ),
    vertical(
      "restaurants",
      named_root("restaurants", "places"),
      named_child("dish_categories", "categories", "restaurant_id"),
      leaf("dishes", "dishes", "category_id", [
        text("name"),
        int("price"),
        int("calories"),
        text("ingredients"),
        int("is_vegetarian"),
        int("is_spicy"),
        text("description"),
        int("score"),
      ]),
    ),
    vertical(
      "taxi",
      named_root("taxi_companies", "companies"),
      named_child("taxi_services", "services", "company_id"),
      leaf("taxi_autos", "autos", "service_id", [
        text("brand"),
        text("number"),
        text("driver_name"),
        text("model"),
        int("year"),
        text("color"),
        int("seats"),
        int("milage"),
      ]),
    ),
    vertical(
      "transport",
      named_root("depots", "depots"),
      named_child("routes", "routes", "depot_id"),
      leaf("transports", "transports", "route_id", [
        text("number"),
        text("departure_time"),
        int("return_time"),
      ]),
    ),
  ]
}

/// Look up a built-in vertical by name.
pub fn find(name: &str) -> Result<VerticalSpec> {
  all()
    .into_iter()
    .find(|v| v.name == name)
    .ok_or_else(|| Error::UnknownVertical(name.to_owned()))
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn every_builtin_vertical_is_valid() {
    for v in all() {
      v.validate().unwrap_or_else(|e| panic!("{}: {e}", v.name));
    }
  }

  #[test]
  fn names_and_tables_are_unique() {
    let verticals = all();
    assert_eq!(verticals.len(), 13);

    let mut names = HashSet::new();
    let mut tables = HashSet::new();
    for v in &verticals {
      assert!(names.insert(v.name.clone()), "duplicate vertical {}", v.name);
      for table in v.tables() {
        assert!(tables.insert(table.to_owned()), "duplicate table {table}");
      }
    }
  }

  #[test]
  fn find_by_name() {
    let taxi = find("taxi").unwrap();
    assert_eq!(taxi.child.segment, "services");
    assert!(matches!(find("bakery"), Err(Error::UnknownVertical(_))));
  }
}
