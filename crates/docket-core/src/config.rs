use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

#[derive(Debug, Clone)]
pub struct Config {
  map:              HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    map.insert(
      "color".to_string(),
      "on".to_string()
    );
    map.insert(
      "seed".to_string(),
      "on".to_string()
    );

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    );
    if let Some(path) = rc {
      info!(docketrc = %path.display(), "loading docketrc");
      cfg.load_file(&path)?;
    } else {
      warn!(
        "no docketrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  /// `Ok(None)` when the key is unset,
  /// an error when it holds something
  /// that is not a boolean word.
  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<Option<bool>> {
    self
      .map
      .get(key)
      .map(|v| {
        parse_bool(v).ok_or_else(
          || {
            anyhow!(
              "invalid boolean for \
               {key}: {v}"
            )
          }
        )
      })
      .transpose()
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

fn resolve_rc_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(rc_env) =
    std::env::var("DOCKETRC")
  {
    if rc_env == "/dev/null" {
      return None;
    }
    return Some(PathBuf::from(rc_env));
  }

  let home_rc = dirs::home_dir()
    .map(|home| home.join(".docketrc"));
  let xdg_rc = dirs::config_dir().map(
    |dir| dir.join("docket/docketrc")
  );

  [home_rc, xdg_rc]
    .into_iter()
    .flatten()
    .find(|candidate| candidate.exists())
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::Config;

  #[test]
  fn defaults_apply_without_rc_file() {
    let cfg = Config::default();
    assert_eq!(
      cfg.get("color").as_deref(),
      Some("on")
    );
    assert_eq!(
      cfg
        .get_bool("seed")
        .expect("valid bool"),
      Some(true)
    );
    assert_eq!(
      cfg
        .get_bool("missing")
        .expect("unset is fine"),
      None
    );
  }

  #[test]
  fn rc_file_with_include_and_overrides()
  {
    let temp =
      tempdir().expect("tempdir");
    let extra =
      temp.path().join("extra.rc");
    fs::write(&extra, "seed = off\n")
      .expect("write include");
    let rc = temp.path().join("docketrc");
    fs::write(
      &rc,
      "# display\ncolor = off  # \
       no ansi\ninclude extra.rc\n"
    )
    .expect("write rc");

    let mut cfg = Config::load(Some(&rc))
      .expect("load rc");
    assert_eq!(cfg.loaded_files.len(), 2);
    assert_eq!(
      cfg.get("color").as_deref(),
      Some("off")
    );
    assert_eq!(
      cfg
        .get_bool("seed")
        .expect("valid bool"),
      Some(false)
    );

    cfg.apply_overrides(vec![(
      "rc.seed".to_string(),
      "yes".to_string()
    )]);
    assert_eq!(
      cfg
        .get_bool("seed")
        .expect("valid bool"),
      Some(true)
    );
  }

  #[test]
  fn malformed_lines_and_bools_are_errors()
  {
    let temp =
      tempdir().expect("tempdir");
    let rc = temp.path().join("docketrc");
    fs::write(&rc, "color\n")
      .expect("write rc");
    assert!(
      Config::load(Some(&rc)).is_err()
    );

    let mut cfg = Config::default();
    cfg.apply_overrides(vec![(
      "seed".to_string(),
      "maybe".to_string()
    )]);
    assert!(cfg.get_bool("seed").is_err());
  }
}
