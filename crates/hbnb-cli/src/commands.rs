use std::fmt;
use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use hbnb_model::Model;
use hbnb_store::{StoreConfig, StoreError, Storage};
use hbnb_types::{FieldKind, TypeTag};

use crate::cli::*;
use crate::coerce;

const CLASS_NAME_MISSING: &str = "** class name missing **";
const CLASS_DOESNT_EXIST: &str = "** class doesn't exist **";
const INSTANCE_ID_MISSING: &str = "** instance id missing **";
const NO_INSTANCE_FOUND: &str = "** no instance found **";
const ATTRIBUTE_NAME_MISSING: &str = "** attribute name missing **";
const VALUE_MISSING: &str = "** value missing **";

/// A user-facing message printed instead of a result.
#[derive(Debug)]
struct Notice(&'static str);

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for Notice {}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = StoreConfig {
        snapshot_path: cli.file,
        pretty: cli.pretty,
        ..StoreConfig::default()
    };
    let path = config.snapshot_path.display().to_string();
    let storage = Storage::open(config).with_context(|| format!("cannot open {path}"))?;
    let mut out = std::io::stdout().lock();
    execute(&storage, cli.command, &mut out)
}

/// Run one command against an open store, writing its output to `out`.
///
/// Input mistakes (missing arguments, unknown types or records, bad field
/// values) are printed as notices. Storage failures are returned.
pub fn execute(storage: &Storage, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    let result = match command {
        Command::Create(args) => cmd_create(storage, args, out),
        Command::Show(args) => cmd_show(storage, args, out),
        Command::Destroy(args) => cmd_destroy(storage, args),
        Command::All(args) => cmd_all(storage, args, out),
        Command::Update(args) => cmd_update(storage, args),
        Command::Count(args) => cmd_count(storage, args, out),
    };
    match result {
        Err(err) => match notice_for(&err) {
            Some(notice) => {
                writeln!(out, "{}", notice.red())?;
                Ok(())
            }
            None => Err(err),
        },
        ok => ok,
    }
}

fn notice_for(err: &anyhow::Error) -> Option<String> {
    if let Some(Notice(message)) = err.downcast_ref::<Notice>() {
        return Some(message.to_string());
    }
    match err.downcast_ref::<StoreError>()? {
        StoreError::UnknownType(_) => Some(CLASS_DOESNT_EXIST.to_string()),
        StoreError::NotFound(_) => Some(NO_INSTANCE_FOUND.to_string()),
        StoreError::Model(e) => Some(format!("** {e} **")),
        _ => None,
    }
}

fn required<'a>(arg: &'a Option<String>, missing: &'static str) -> anyhow::Result<&'a str> {
    arg.as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Notice(missing).into())
}

fn type_tag(class: &str) -> anyhow::Result<TypeTag> {
    Ok(class.parse::<TypeTag>().map_err(StoreError::from)?)
}

fn field_kind(tag: TypeTag, field: &str) -> Option<FieldKind> {
    Model::fields_of(tag)
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, kind)| *kind)
}

fn cmd_create(storage: &Storage, args: CreateArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let class = required(&args.class, CLASS_NAME_MISSING)?;
    let tag = type_tag(class)?;
    let overrides: Vec<_> = args
        .params
        .iter()
        .filter_map(|param| coerce::parse_param(param))
        .map(|(field, value)| {
            let value = coerce::fit(field_kind(tag, &field), value);
            (field, value)
        })
        .collect();
    let id = storage.create_entity(class, overrides)?;
    writeln!(out, "{}", id.as_str().yellow())?;
    Ok(())
}

fn cmd_show(storage: &Storage, args: TargetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let class = required(&args.class, CLASS_NAME_MISSING)?;
    type_tag(class)?;
    let id = required(&args.id, INSTANCE_ID_MISSING)?;
    let model = storage.get_entity(class, id)?;
    writeln!(out, "{}", model.textual_form())?;
    Ok(())
}

fn cmd_destroy(storage: &Storage, args: TargetArgs) -> anyhow::Result<()> {
    let class = required(&args.class, CLASS_NAME_MISSING)?;
    type_tag(class)?;
    let id = required(&args.id, INSTANCE_ID_MISSING)?;
    storage.delete_entity(class, id)?;
    Ok(())
}

fn cmd_all(storage: &Storage, args: ClassArgs, out: &mut impl Write) -> anyhow::Result<()> {
    for line in storage.list_entities(args.class.as_deref())? {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn cmd_update(storage: &Storage, args: UpdateArgs) -> anyhow::Result<()> {
    let class = required(&args.class, CLASS_NAME_MISSING)?;
    let tag = type_tag(class)?;
    let id = required(&args.id, INSTANCE_ID_MISSING)?;
    storage.get_entity(class, id)?;
    let attribute = required(&args.attribute, ATTRIBUTE_NAME_MISSING)?;
    let raw = required(&args.value, VALUE_MISSING)?;
    let value = coerce::parse_value(field_kind(tag, attribute), raw);
    storage.update_field(class, id, attribute, value)?;
    Ok(())
}

fn cmd_count(storage: &Storage, args: ClassArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let count = storage.count(args.class.as_deref())?;
    writeln!(out, "{}", count.to_string().bold())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use hbnb_model::{Place, Record, RecordSource, State, User};

    fn open_in(dir: &tempfile::TempDir) -> Storage {
        colored::control::set_override(false);
        Storage::open(StoreConfig::at(dir.path().join("file.json"))).unwrap()
    }

    fn run(storage: &Storage, words: &[&str]) -> String {
        let mut argv = vec!["hbnb"];
        argv.extend_from_slice(words);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        execute(storage, cli.command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[test]
    fn create_prints_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "State", "name=\"California\""]);
        let id = id.trim();

        let state: State = open_in(&dir)
            .get_entity("State", id)
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(state.name, "California");
    }

    #[test]
    fn create_place_coerces_params() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let out = run(
            &storage,
            &[
                "create",
                "Place",
                "name=\"My_little_house\"",
                "number_rooms=4",
                "price_by_night=300",
                "latitude=37.773972",
                "longitude=-122.431297",
                "bogus",
            ],
        );
        let place: Place = storage
            .get_entity("Place", out.trim())
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(place.name, "My little house");
        assert_eq!(place.number_rooms, 4);
        assert_eq!(place.price_by_night, 300);
        assert_eq!(place.latitude, 37.773972);
        assert_eq!(place.longitude, -122.431297);
    }

    #[test]
    fn create_number_into_string_field() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let out = run(&storage, &["create", "User", "first_name=42"]);
        let user: User = storage
            .get_entity("User", out.trim())
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(user.first_name, "42");
    }

    #[test]
    fn create_notices() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        assert_eq!(run(&storage, &["create"]).trim(), CLASS_NAME_MISSING);
        assert_eq!(run(&storage, &["create", "Planet"]).trim(), CLASS_DOESNT_EXIST);
        let out = run(&storage, &["create", "State", "colour=\"red\""]);
        assert!(out.starts_with("** "));
        assert!(out.contains("colour"));
        assert_eq!(storage.count(None).unwrap(), 0);
    }

    // -----------------------------------------------------------------------
    // Show / destroy / all / count
    // -----------------------------------------------------------------------

    #[test]
    fn show_prints_textual_form() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "State", "name=\"Nevada\""]);
        let id = id.trim();
        let out = run(&storage, &["show", "State", id]);
        assert!(out.starts_with(&format!("[State] ({id}) {{")));
        assert!(out.contains("\"name\":\"Nevada\""));
    }

    #[test]
    fn show_notices() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        assert_eq!(run(&storage, &["show"]).trim(), CLASS_NAME_MISSING);
        assert_eq!(run(&storage, &["show", "Planet"]).trim(), CLASS_DOESNT_EXIST);
        assert_eq!(run(&storage, &["show", "State"]).trim(), INSTANCE_ID_MISSING);
        assert_eq!(run(&storage, &["show", "State", "nope"]).trim(), NO_INSTANCE_FOUND);
    }

    #[test]
    fn destroy_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "Amenity", "name=\"Wifi\""]);
        let id = id.trim();
        assert_eq!(run(&storage, &["destroy", "Amenity", id]), "");
        assert_eq!(run(&storage, &["show", "Amenity", id]).trim(), NO_INSTANCE_FOUND);
        assert_eq!(open_in(&dir).count(None).unwrap(), 0);
    }

    #[test]
    fn all_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        run(&storage, &["create", "State", "name=\"A\""]);
        run(&storage, &["create", "State", "name=\"B\""]);
        run(&storage, &["create", "City", "name=\"C\""]);

        assert_eq!(run(&storage, &["all"]).lines().count(), 3);
        let states = run(&storage, &["all", "State"]);
        assert_eq!(states.lines().count(), 2);
        assert!(states.lines().all(|l| l.starts_with("[State]")));
        assert_eq!(run(&storage, &["all", "Planet"]).trim(), CLASS_DOESNT_EXIST);

        assert_eq!(run(&storage, &["count"]).trim(), "3");
        assert_eq!(run(&storage, &["count", "City"]).trim(), "1");
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[test]
    fn update_sets_typed_field() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "Place"]);
        let id = id.trim();
        std::thread::sleep(std::time::Duration::from_millis(2));
        run(&storage, &["update", "Place", id, "max_guest", "6"]);
        run(&storage, &["update", "Place", id, "name", "\"Beach house\""]);

        let place = storage.registry().lookup_as::<Place>(id).unwrap();
        assert_eq!(place.max_guest, 6);
        assert_eq!(place.name, "Beach house");
        assert!(place.entity.updated_at > place.entity.created_at);
        assert_eq!(place.key().to_string(), format!("Place.{id}"));
    }

    #[test]
    fn update_notices_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "User"]);
        let id = id.trim();
        assert_eq!(run(&storage, &["update"]).trim(), CLASS_NAME_MISSING);
        assert_eq!(run(&storage, &["update", "Planet"]).trim(), CLASS_DOESNT_EXIST);
        assert_eq!(run(&storage, &["update", "User"]).trim(), INSTANCE_ID_MISSING);
        assert_eq!(run(&storage, &["update", "User", "nope"]).trim(), NO_INSTANCE_FOUND);
        assert_eq!(run(&storage, &["update", "User", id]).trim(), ATTRIBUTE_NAME_MISSING);
        assert_eq!(run(&storage, &["update", "User", id, "email"]).trim(), VALUE_MISSING);
    }

    #[test]
    fn update_rejects_protected_and_mistyped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        let id = run(&storage, &["create", "Place"]);
        let id = id.trim();
        let out = run(&storage, &["update", "Place", id, "id", "other"]);
        assert!(out.contains("cannot be assigned"));
        let out = run(&storage, &["update", "Place", id, "max_guest", "many"]);
        assert!(out.starts_with("** invalid value"));
        assert!(storage.get_entity("Place", id).is_ok());
    }

    #[test]
    fn storage_failures_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_in(&dir);
        // A directory in place of the snapshot file makes every save fail.
        std::fs::create_dir(storage.snapshot().path()).unwrap();
        let cli = Cli::try_parse_from(["hbnb", "create", "State"]).unwrap();
        let mut out = Vec::new();
        assert!(execute(&storage, cli.command, &mut out).is_err());
    }
}
