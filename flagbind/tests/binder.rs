//! End-to-end binding: flags, environment and config files merged and
//! decoded into a typed configuration.

mod common;

use anyhow::{Result, anyhow, ensure};
use flagbind::BindError;
use rstest::rstest;
use serde_json::json;
use test_helpers::{set_envs, with_clean_jail};

use common::{bind, load, manager};

const NO_FILE: &str = "--config=";

#[rstest]
fn defaults_fill_every_option() -> Result<()> {
    with_clean_jail(|_| {
        let cfg = load(&["app", NO_FILE])?;
        ensure!(cfg.server.address.is_empty());
        ensure!(cfg.server.port == 0);
        ensure!(cfg.server.max_conns == 0);
        ensure!(cfg.server.labels.is_empty());
        ensure!(!cfg.log.debug);
        ensure!(cfg.tags.is_empty());
        ensure!(cfg.ratio == 0.0);
        Ok(())
    })
}

#[rstest]
#[case::flag_wins(&["app", "--server.port=9000"], &[("APP_SERVER_PORT", "8000")], 9000)]
#[case::short_flag(&["app", "-p", "9001"], &[("APP_SERVER_PORT", "8000")], 9001)]
#[case::env_over_file(&["app"], &[("APP_SERVER_PORT", "8000")], 8000)]
#[case::file_only(&["app"], &[], 7000)]
#[case::negative_separate(&["app", "--server.port", "-1"], &[], -1)]
#[case::negative_equals(&["app", "--server.port=-1"], &[], -1)]
#[case::negative_short(&["app", "-p", "-2"], &[("APP_SERVER_PORT", "8000")], -2)]
fn sources_follow_precedence(
    #[case] args: &[&str],
    #[case] env: &[(&str, &str)],
    #[case] expected: i64,
) -> Result<()> {
    with_clean_jail(|j| {
        j.create_file("config.yml", "server:\n  port: 7000\n")?;
        set_envs(j, env);
        let cfg = load(args)?;
        ensure!(cfg.server.port == expected, "got {}", cfg.server.port);
        Ok(())
    })
}

#[rstest]
fn explicit_config_path_is_read() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file(
            "settings.toml",
            "debug = true\ntags = [\"a\", \"b\"]\n\n[server]\naddress = \"0.0.0.0\"\n",
        )?;
        let cfg = load(&["app", "-c", "settings.toml"])?;
        ensure!(cfg.log.debug);
        ensure!(cfg.tags == ["a", "b"]);
        ensure!(cfg.server.address == "0.0.0.0");
        Ok(())
    })
}

#[rstest]
fn missing_default_file_is_an_error() -> Result<()> {
    with_clean_jail(|_| {
        let err = bind(&mut manager(), &["app"])
            .err()
            .ok_or_else(|| anyhow!("expected a missing file error"))?;
        ensure!(matches!(&*err, BindError::File { .. }), "got {err}");
        Ok(())
    })
}

#[rstest]
fn empty_environment_value_overrides_file() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file("config.yml", "server:\n  address: file-host\n  port: 7000\n")?;
        set_envs(j, &[("APP_SERVER_ADDRESS", ""), ("APP_SERVER_PORT", "")]);
        let cfg = load(&["app"])?;
        ensure!(cfg.server.address.is_empty(), "got {}", cfg.server.address);
        ensure!(cfg.server.port == 0);
        Ok(())
    })
}

#[rstest]
fn dashed_names_bind_to_underscored_variables() -> Result<()> {
    with_clean_jail(|j| {
        set_envs(j, &[("APP_SERVER_MAX_CONNS", "512"), ("APP_DEBUG", "true")]);
        let cfg = load(&["app", NO_FILE])?;
        ensure!(cfg.server.max_conns == 512);
        ensure!(cfg.log.debug);
        Ok(())
    })
}

#[rstest]
fn unparseable_environment_value_is_an_error() -> Result<()> {
    with_clean_jail(|j| {
        set_envs(j, &[("APP_SERVER_PORT", "eighty")]);
        let err = bind(&mut manager(), &["app", NO_FILE])
            .err()
            .ok_or_else(|| anyhow!("expected an env error"))?;
        ensure!(
            matches!(&*err, BindError::Env { var, .. } if var == "APP_SERVER_PORT"),
            "got {err}"
        );
        Ok(())
    })
}

#[rstest]
#[case::repeated(&["app", NO_FILE, "--server.labels", "a=1", "--server.labels", "b=2"], &[("a", "1"), ("b", "2")])]
#[case::delimited(&["app", NO_FILE, "--server.labels", "a=1,b=2"], &[("a", "1"), ("b", "2")])]
#[case::last_wins(&["app", NO_FILE, "--server.labels", "a=1", "--server.labels", "a=2"], &[("a", "2")])]
#[case::value_keeps_equals(&["app", NO_FILE, "--server.labels", "url=a=b"], &[("url", "a=b")])]
fn map_flags_decode_into_maps(
    #[case] args: &[&str],
    #[case] expected: &[(&str, &str)],
) -> Result<()> {
    with_clean_jail(|_| {
        let cfg = load(args)?;
        let got: Vec<(&str, &str)> = cfg
            .server
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        ensure!(got == expected, "got {got:?}");
        Ok(())
    })
}

#[rstest]
fn malformed_map_flag_names_the_input() -> Result<()> {
    with_clean_jail(|_| {
        let err = bind(&mut manager(), &["app", NO_FILE, "--server.labels", "bad"])
            .err()
            .ok_or_else(|| anyhow!("expected a map entry error"))?;
        ensure!(
            matches!(&*err, BindError::InvalidMapEntry { input } if input == "bad"),
            "got {err}"
        );
        ensure!(err.to_string().contains("bad"));
        Ok(())
    })
}

#[rstest]
fn map_values_come_from_environment_and_files() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file("config.yml", "server:\n  labels:\n    zone: eu\n")?;
        let from_file = load(&["app"])?;
        ensure!(from_file.server.labels.get("zone").map(String::as_str) == Some("eu"));

        set_envs(j, &[("APP_SERVER_LABELS", "team=core,tier=1")]);
        let from_env = load(&["app"])?;
        ensure!(from_env.server.labels.len() == 2);
        ensure!(from_env.server.labels.get("tier").map(String::as_str) == Some("1"));
        Ok(())
    })
}

#[rstest]
fn dotted_map_keys_in_files_survive_the_merge() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file(
            "config.yml",
            "server:\n  labels:\n    app.kubernetes.io/name: web\n    zone: eu\n",
        )?;
        let cfg = load(&["app"])?;
        let got: Vec<(&str, &str)> = cfg
            .server
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        ensure!(
            got == [("app.kubernetes.io/name", "web"), ("zone", "eu")],
            "got {got:?}"
        );
        Ok(())
    })
}

#[rstest]
fn negative_floats_parse_as_separate_values() -> Result<()> {
    with_clean_jail(|_| {
        let cfg = load(&["app", NO_FILE, "--ratio", "-0.5"])?;
        ensure!(cfg.ratio == -0.5, "got {}", cfg.ratio);
        Ok(())
    })
}

#[rstest]
fn sequence_flags_accumulate_in_order() -> Result<()> {
    with_clean_jail(|_| {
        let cfg = load(&["app", NO_FILE, "-t", "x,y", "--tags", "z", "--ratio", "0.5"])?;
        ensure!(cfg.tags == ["x", "y", "z"]);
        ensure!(cfg.ratio == 0.5);
        Ok(())
    })
}

#[rstest]
fn type_mismatch_is_a_decode_error() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file("config.yml", "server:\n  port: not-a-number\n")?;
        let err = bind(&mut manager(), &["app"])
            .err()
            .ok_or_else(|| anyhow!("expected a decode error"))?;
        ensure!(matches!(&*err, BindError::Decode { .. }), "got {err}");
        Ok(())
    })
}

#[rstest]
fn unregistered_file_keys_resolve_from_environment() -> Result<()> {
    with_clean_jail(|j| {
        j.create_file("config.yml", "database:\n  url: file-url\n  pool: 4\n")?;
        set_envs(j, &[("APP_DATABASE_URL", "env-url")]);
        let mut manager = manager();
        let matches = manager
            .parse_from(["app"])
            .map_err(|e| anyhow!(e.to_string()))?;
        manager
            .read_from_file(&matches)
            .map_err(|e| anyhow!(e.to_string()))?;
        let settings = manager.settings().map_err(|e| anyhow!(e.to_string()))?;
        ensure!(settings["database"] == json!({"url": "env-url", "pool": 4}), "got {settings}");
        ensure!(manager.config_file().map(|p| p.as_str()) == Some("./config.yml"));
        Ok(())
    })
}

#[rstest]
fn help_is_a_display_request() -> Result<()> {
    let err = manager()
        .parse_from(["app", "--help"])
        .err()
        .ok_or_else(|| anyhow!("expected help to short-circuit"))?;
    let clap_err = err
        .as_clap()
        .ok_or_else(|| anyhow!("expected a clap error, got {err}"))?;
    ensure!(flagbind::is_display_request(clap_err));
    Ok(())
}
