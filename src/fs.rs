use crate::prelude::*;
use crate::util::path::PathExt as _;
use futures::prelude::*;

pub(crate) const VIDEO_EXTENSION: &str = "mp4";

/// One candidate file found on disk.
#[derive(Debug, Clone)]
pub(crate) struct ScannedVideo {
    pub(crate) file_name: String,
    pub(crate) path: Utf8PathBuf,
}

/// Enumerates video files directly under `root` and exactly one level below
/// it. Recording software groups clips into per-game subfolders; anything
/// nested deeper is out of scope. Results come in traversal order.
pub(crate) async fn scan_videos(root: &Utf8Path) -> Result<Vec<ScannedVideo>> {
    let root = fs::canonicalize(root)
        .await
        .with_context(|| format!("Failed to resolve the video folder `{root}`"))?;
    let root = root.unwrap_utf8();

    let mut videos = vec![];
    let mut subfolders = vec![];

    for entry in entries(root).await? {
        let path = entry.path().unwrap_utf8().to_owned();

        if fs::metadata(&path).await?.is_dir() {
            subfolders.push(path);
        } else if is_video(&path) {
            videos.push(ScannedVideo::new(path)?);
        }
    }

    for subfolder in subfolders {
        for entry in entries(&subfolder).await? {
            let path = entry.path().unwrap_utf8().to_owned();

            if fs::metadata(&path).await?.is_file() && is_video(&path) {
                videos.push(ScannedVideo::new(path)?);
            }
        }
    }

    Ok(videos)
}

impl ScannedVideo {
    fn new(path: Utf8PathBuf) -> Result<Self> {
        let file_name = path
            .file_name()
            .with_context(|| format!("Scanned path has no file name: `{path}`"))?
            .to_owned();

        Ok(Self { file_name, path })
    }
}

fn is_video(path: &Utf8Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case(VIDEO_EXTENSION))
}

async fn entries(dir: &Utf8Path) -> Result<Vec<fs::DirEntry>> {
    let dir = fs::read_dir(dir).await?;

    read_dir_stream(dir).try_collect().await
}

fn read_dir_stream(dir: fs::ReadDir) -> impl futures::Stream<Item = Result<fs::DirEntry>> {
    stream::unfold(dir, |mut dir| async move {
        dir.next_entry()
            .err_into()
            .await
            .transpose()
            .map(|entry| (entry, dir))
    })
}

/// Launches the OS-native viewer on the file.
pub(crate) async fn preview_video(path: &Utf8Path) -> Result {
    let (program, args) = if cfg!(target_os = "linux") {
        ("xdg-open", vec![path.as_str()])
    } else if cfg!(target_os = "macos") {
        ("open", vec![path.as_str()])
    } else if cfg!(windows) {
        ("cmd", vec!["/C", "start", "", path.as_str()])
    } else {
        bail!("Video preview isn't available on this OS");
    };

    crate::util::cmd::run_cmd(program, args).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test_log::test(tokio::test)]
    async fn scan_two_levels() {
        let root = tempfile::tempdir().unwrap();
        let root_path = root.path();

        let write = |rel: &str| fs::write(root_path.join(rel), b"");

        fs::create_dir_all(root_path.join("some-game/deeper"))
            .await
            .unwrap();
        fs::create_dir_all(root_path.join("other-game"))
            .await
            .unwrap();

        write("a.mp4").await.unwrap();
        write("notes.txt").await.unwrap();
        write("some-game/b.mp4").await.unwrap();
        write("some-game/thumb.png").await.unwrap();
        write("other-game/c.MP4").await.unwrap();
        // Third level, out of scope
        write("some-game/deeper/d.mp4").await.unwrap();

        let videos = scan_videos(root_path.unwrap_utf8()).await.unwrap();

        let mut names = videos
            .iter()
            .map(|video| video.file_name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();

        expect![[r#"["a.mp4", "b.mp4", "c.MP4"]"#]].assert_eq(&format!("{names:?}"));

        for video in &videos {
            assert!(video.path.is_absolute());
        }
    }
}
