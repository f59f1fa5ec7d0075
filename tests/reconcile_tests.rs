//! Integrationstests für die Reconciliation:
//! - Idempotenz von set
//! - Minimaler Churn (In-place-Update statt Löschen/Neuanlegen)
//! - Typwechsel erzwingt Neuanlage
//! - Fail-fast-Validierung ohne Teil-Mutation

use geo_feature_editor::{EditError, FeatureEditor, GeometryType};
use serde_json::{json, Value};

fn editor() -> FeatureEditor {
    let _ = env_logger::builder().is_test(true).try_init();
    FeatureEditor::new()
}

fn punkt_feature(id: &str, x: f64, y: f64) -> Value {
    json!({
        "type": "Feature", "id": id, "properties": {},
        "geometry": {"type": "Point", "coordinates": [x, y]},
    })
}

fn polygon_feature(id: &str, breite: f64) -> Value {
    json!({
        "type": "Feature", "id": id, "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [[
            [0.0, 0.0], [breite, 0.0], [breite, breite], [0.0, 0.0],
        ]]},
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

// ─── set ─────────────────────────────────────────────────────────────

#[test]
fn test_set_ist_idempotent() {
    let mut editor = editor();
    let eingabe = collection(vec![polygon_feature("a", 4.0), punkt_feature("b", 1.0, 1.0)]);

    let erste = editor.set(&eingabe).expect("set darf nicht fehlschlagen");
    let zweite = editor.set(&eingabe).expect("set darf nicht fehlschlagen");

    assert_eq!(erste, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(erste, zweite, "beide Aufrufe müssen dieselben IDs liefern");
    assert_eq!(editor.state.store.feature_count(), 2);
    assert_eq!(
        editor.state.store.get("a").map(|f| f.geometry_type()),
        Some(GeometryType::Polygon)
    );
}

#[test]
fn test_set_aktualisiert_in_place_und_loescht_nur_fehlende() {
    let mut editor = editor();
    editor
        .set(&collection(vec![polygon_feature("a", 4.0)]))
        .expect("set darf nicht fehlschlagen");

    let renders_vorher = editor.state.store.render_count();
    let ids = editor
        .set(&collection(vec![
            polygon_feature("a", 9.0),
            punkt_feature("b", 1.0, 1.0),
        ]))
        .expect("set darf nicht fehlschlagen");

    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    // In-place-Update: `a` behält seine Position in der Ausgabe-Reihenfolge.
    // Ein Löschen/Neuanlegen würde es hinter `b` einsortieren.
    assert_eq!(
        editor.state.store.all_ids(),
        vec!["a".to_string(), "b".to_string()]
    );
    let a = editor.get("a").expect("Feature a erwartet");
    assert_eq!(a["geometry"]["coordinates"][0][1], json!([9.0, 0.0]));
    // Die gesamte Operation feuert genau eine Render-Benachrichtigung
    assert_eq!(editor.state.store.render_count(), renders_vorher + 1);
}

#[test]
fn test_set_loescht_ids_ausserhalb_der_eingabe() {
    let mut editor = editor();
    editor
        .set(&collection(vec![
            punkt_feature("a", 0.0, 0.0),
            punkt_feature("b", 1.0, 1.0),
        ]))
        .expect("set darf nicht fehlschlagen");

    editor
        .set(&collection(vec![punkt_feature("b", 2.0, 2.0)]))
        .expect("set darf nicht fehlschlagen");

    assert!(editor.get("a").is_none(), "a muss entfernt sein");
    assert_eq!(editor.state.store.all_ids(), vec!["b".to_string()]);
}

#[test]
fn test_set_akzeptiert_nur_feature_collection() {
    let mut editor = editor();
    let einzel = punkt_feature("a", 0.0, 0.0);

    let err = editor.set(&einzel).unwrap_err();
    assert_eq!(
        err,
        EditError::Validation("Ungültige FeatureCollection".to_string())
    );

    // add ist toleranter und packt Einzel-Features selbst ein
    let ids = editor.add(&einzel).expect("add darf nicht fehlschlagen");
    assert_eq!(ids, vec!["a".to_string()]);
}

// ─── add / upsert ────────────────────────────────────────────────────

#[test]
fn test_typwechsel_erzwingt_neuanlage() {
    let mut editor = editor();
    editor
        .add(&collection(vec![polygon_feature("a", 4.0)]))
        .expect("add darf nicht fehlschlagen");

    editor
        .add(&collection(vec![punkt_feature("a", 7.0, 7.0)]))
        .expect("add darf nicht fehlschlagen");

    let a = editor.state.store.get("a").expect("Feature a erwartet");
    assert_eq!(a.geometry_type(), GeometryType::Point);
    assert_eq!(editor.state.store.feature_count(), 1);
}

#[test]
fn test_properties_werden_vollstaendig_ersetzt() {
    let mut editor = editor();
    editor
        .add(&json!({
            "type": "Feature", "id": "a", "properties": {"alt": 1, "bleibt_nicht": true},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
        }))
        .expect("add darf nicht fehlschlagen");

    editor
        .add(&json!({
            "type": "Feature", "id": "a", "properties": {"neu": 2},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
        }))
        .expect("add darf nicht fehlschlagen");

    let a = editor.get("a").expect("Feature a erwartet");
    assert_eq!(a["properties"], json!({"neu": 2}));
}

#[test]
fn test_duplikate_in_einer_eingabe_letzter_gewinnt() {
    let mut editor = editor();
    let ids = editor
        .add(&collection(vec![
            punkt_feature("a", 1.0, 1.0),
            punkt_feature("a", 5.0, 5.0),
        ]))
        .expect("add darf nicht fehlschlagen");

    assert_eq!(ids, vec!["a".to_string(), "a".to_string()]);
    let a = editor.get("a").expect("Feature a erwartet");
    assert_eq!(a["geometry"]["coordinates"], json!([5.0, 5.0]));
}

#[test]
fn test_add_praegt_frische_ids() {
    let mut editor = editor();
    let ids = editor
        .add(&json!({
            "type": "Feature", "properties": {},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
        }))
        .expect("add darf nicht fehlschlagen");

    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].len(), 32, "geprägte IDs sind 32 Hex-Zeichen");
    assert!(editor.get(&ids[0]).is_some());
}

#[test]
fn test_hoehe_wird_bei_normalisierung_verworfen() {
    let mut editor = editor();
    editor
        .add(&json!({
            "type": "Feature", "id": "a", "properties": {},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 444.0]},
        }))
        .expect("add darf nicht fehlschlagen");

    let a = editor.get("a").expect("Feature a erwartet");
    assert_eq!(a["geometry"]["coordinates"], json!([1.0, 2.0]));
}

// ─── Validierung ─────────────────────────────────────────────────────

#[test]
fn test_null_geometrie_laesst_store_unveraendert() {
    let mut editor = editor();
    let err = editor
        .add(&collection(vec![json!({
            "type": "Feature", "properties": {}, "geometry": null,
        })]))
        .unwrap_err();

    assert_eq!(err, EditError::Validation("Geometrie ist null".to_string()));
    assert!(editor.state.store.is_empty(), "Store muss leer bleiben");
    assert_eq!(
        editor.state.store.render_count(),
        0,
        "ohne Mutation darf keine Benachrichtigung feuern"
    );
}

#[test]
fn test_fail_fast_ohne_teil_mutation() {
    let mut editor = editor();
    editor
        .set(&collection(vec![punkt_feature("a", 0.0, 0.0)]))
        .expect("set darf nicht fehlschlagen");
    let renders_vorher = editor.state.store.render_count();

    // Zweites Feature ist ungültig: der gesamte Aufruf schlägt fehl,
    // auch das gültige erste Feature wird nicht übernommen.
    let err = editor
        .set(&collection(vec![
            punkt_feature("b", 1.0, 1.0),
            json!({"type": "Feature", "properties": {}, "geometry": null}),
        ]))
        .unwrap_err();

    assert!(matches!(err, EditError::Validation(_)));
    assert_eq!(editor.state.store.all_ids(), vec!["a".to_string()]);
    assert_eq!(editor.state.store.render_count(), renders_vorher);
}

#[test]
fn test_unbekannter_geometrietyp_abgelehnt() {
    let mut editor = editor();
    let err = editor
        .add(&collection(vec![json!({
            "type": "Feature", "properties": {},
            "geometry": {"type": "Quatsch", "coordinates": [0.0, 0.0]},
        })]))
        .unwrap_err();

    assert_eq!(err, EditError::UnsupportedGeometry("Quatsch".to_string()));
    assert!(editor.state.store.is_empty());
}

#[test]
fn test_geometry_collection_abgelehnt() {
    let mut editor = editor();
    let err = editor
        .add(&collection(vec![json!({
            "type": "Feature", "properties": {},
            "geometry": {"type": "GeometryCollection", "geometries": []},
        })]))
        .unwrap_err();

    assert_eq!(
        err,
        EditError::UnsupportedGeometry("GeometryCollection".to_string())
    );
}

// ─── Ausgabe ─────────────────────────────────────────────────────────

#[test]
fn test_get_all_liefert_stabile_reihenfolge() {
    let mut editor = editor();
    editor
        .set(&collection(vec![
            punkt_feature("c", 0.0, 0.0),
            punkt_feature("a", 1.0, 1.0),
            punkt_feature("b", 2.0, 2.0),
        ]))
        .expect("set darf nicht fehlschlagen");

    let alle = editor.get_all();
    let ids: Vec<&str> = alle["features"]
        .as_array()
        .expect("features-Array erwartet")
        .iter()
        .map(|f| f["id"].as_str().expect("id erwartet"))
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_set_feature_property() {
    let mut editor = editor();
    editor
        .set(&collection(vec![punkt_feature("a", 0.0, 0.0)]))
        .expect("set darf nicht fehlschlagen");

    editor
        .set_feature_property("a", "name", json!("Hofstelle"))
        .expect("Property-Setzen darf nicht fehlschlagen");
    let a = editor.get("a").expect("Feature a erwartet");
    assert_eq!(a["properties"]["name"], "Hofstelle");

    let err = editor
        .set_feature_property("geist", "name", json!("x"))
        .unwrap_err();
    assert_eq!(err, EditError::MissingFeature("geist".to_string()));
}
