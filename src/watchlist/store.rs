use super::{TrackedFile, Watchlist};
use crate::prelude::*;

/// Field separator. Filepaths are in play, so the token is deliberately
/// exaggerated. A path that contains the separator corrupts parsing — known
/// limitation, not handled.
const SEPARATOR: &str = " ---------- ";

/// Reads the watchlist file. A tracked file that is gone from disk is a soft
/// error (flagged `missing`, still added, so it can be purged explicitly
/// later); a malformed line aborts the whole load — a ledger that doesn't
/// parse cannot be partially trusted.
pub(crate) async fn load(path: &Utf8Path) -> Result<Watchlist> {
    info!("Reading watchlist file...");

    let contents = fs::read_to_string(path).await?;

    let mut files = vec![];
    let mut missing_count = 0;

    for line in contents.lines().filter(|line| !line.is_empty()) {
        let file = parse_line(line)?;

        if file.missing() {
            warn!("Couldn't find file: {}", file.path());
            missing_count += 1;
        }

        files.push(file);
    }

    let watchlist = Watchlist::new(files);

    info!(
        "Successfully parsed watchlist file! {} files parsed. {missing_count} files missing.",
        watchlist.len()
    );

    Ok(watchlist)
}

/// Same as [`load`], but a watchlist file that doesn't exist yet is an empty
/// watchlist rather than an error.
pub(crate) async fn load_or_default(path: &Utf8Path) -> Result<Watchlist> {
    if !path.try_exists()? {
        info!("No watchlist file at `{path}` yet, starting empty");
        return Ok(Watchlist::default());
    }

    load(path).await
}

fn parse_line(line: &str) -> Result<TrackedFile> {
    let fields = line.split(SEPARATOR).collect_vec();

    let [path, ignored, archived, uploaded] = fields[..] else {
        bail!(
            "Malformed watchlist line (expected 4 fields, got {}): `{line}`",
            fields.len()
        );
    };

    let parse_flag = |raw: &str| {
        raw.parse::<u8>().map(|flag| flag != 0).with_context(|| {
            format!("Error parsing watchlist flags! [path={path},raw={raw}]")
        })
    };

    let (ignored, archived, uploaded) =
        (parse_flag(ignored)?, parse_flag(archived)?, parse_flag(uploaded)?);

    let path = Utf8PathBuf::from(path);
    let missing = !path.try_exists()?;

    Ok(TrackedFile::with_flags(
        path, ignored, archived, uploaded, missing,
    ))
}

/// Writes the whole watchlist back, overwriting the file. Every entry is
/// persisted, missing ones included; `missing` itself is never written, so a
/// file that reappears on disk is simply tracked again on the next load.
pub(crate) async fn save(watchlist: &Watchlist, path: &Utf8Path) -> Result {
    info!("Writing watchlist file...");

    let contents: String = watchlist
        .iter()
        .map(|file| {
            format!(
                "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}\n",
                file.path(),
                file.ignored() as u8,
                file.archived() as u8,
                file.uploaded() as u8,
            )
        })
        .collect();

    fs::write(path, contents).await.err_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watchlist::Flag;

    async fn fixture(files: &[&str]) -> (tempfile::TempDir, Vec<Utf8PathBuf>) {
        let dir = tempfile::tempdir().unwrap();

        let mut paths = vec![];
        for file in files {
            let path = dir.path().join(file);
            fs::write(&path, b"").await.unwrap();
            paths.push(Utf8PathBuf::try_from(path).unwrap());
        }

        (dir, paths)
    }

    #[test_log::test(tokio::test)]
    async fn round_trip_preserves_flags() {
        let (dir, paths) = fixture(&["a.mp4", "b.mp4", "c.mp4"]).await;
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        let mut watchlist = Watchlist::default();
        watchlist.add(TrackedFile::new(paths[0].clone()));
        watchlist.add(TrackedFile::with_flags(paths[1].clone(), true, false, true, false));
        watchlist.add(TrackedFile::with_flags(paths[2].clone(), false, true, false, false));

        save(&watchlist, &ledger).await.unwrap();
        let loaded = load(&ledger).await.unwrap();

        assert_eq!(loaded.len(), watchlist.len());

        for (before, after) in watchlist.iter().zip(loaded.iter()) {
            assert_eq!(before, after);
            assert!(!after.missing());
        }
    }

    #[test_log::test(tokio::test)]
    async fn missing_file_is_flagged_but_kept() {
        let (dir, paths) = fixture(&["here.mp4"]).await;
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        let gone = Utf8PathBuf::try_from(dir.path().join("gone.mp4")).unwrap();

        let mut watchlist = Watchlist::default();
        watchlist.add(TrackedFile::new(paths[0].clone()));
        watchlist.add(TrackedFile::new(gone.clone()));

        save(&watchlist, &ledger).await.unwrap();
        let loaded = load(&ledger).await.unwrap();

        // Still two entries: the missing one stays purgeable
        assert_eq!(loaded.len(), 2);
        assert!(loaded.get(&gone).unwrap().missing());
        assert!(!loaded.get(&paths[0]).unwrap().missing());

        // Only nonmissing entries are selectable
        assert_eq!(loaded.nonmissing().count(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn malformed_flag_aborts_the_load() {
        let (dir, paths) = fixture(&["a.mp4", "b.mp4"]).await;
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        let contents = format!(
            "{a}{SEPARATOR}0{SEPARATOR}0{SEPARATOR}0\n\
             {b}{SEPARATOR}0{SEPARATOR}oops{SEPARATOR}1\n",
            a = paths[0],
            b = paths[1],
        );
        fs::write(&ledger, contents).await.unwrap();

        let err = load(&ledger).await.unwrap_err();
        assert!(err.to_string().contains("Error parsing watchlist flags"));
    }

    #[test_log::test(tokio::test)]
    async fn wrong_field_count_aborts_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        fs::write(&ledger, format!("lonely.mp4{SEPARATOR}1\n"))
            .await
            .unwrap();

        let err = load(&ledger).await.unwrap_err();
        assert!(err.to_string().contains("expected 4 fields"));
    }

    #[test_log::test(tokio::test)]
    async fn bootstrap_without_a_ledger_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        let watchlist = load_or_default(&ledger).await.unwrap();
        assert!(watchlist.is_empty());

        // But an existing-yet-unreadable ledger is still fatal
        load(&ledger).await.unwrap_err();
    }

    #[test_log::test(tokio::test)]
    async fn set_flag_survives_round_trip() {
        let (dir, paths) = fixture(&["a.mp4"]).await;
        let ledger = Utf8PathBuf::try_from(dir.path().join("watchlist.txt")).unwrap();

        let mut watchlist = Watchlist::default();
        watchlist.add(TrackedFile::new(paths[0].clone()));
        watchlist
            .set_flag(&paths[0], Flag::Uploaded, true)
            .unwrap();

        save(&watchlist, &ledger).await.unwrap();
        let loaded = load(&ledger).await.unwrap();

        assert!(loaded.get(&paths[0]).unwrap().uploaded());
        assert!(!loaded.get(&paths[0]).unwrap().ignored());
    }
}
