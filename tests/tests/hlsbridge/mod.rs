mod lifecycle;
mod subtitles;
mod sync;
