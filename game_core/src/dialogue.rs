//! Hostess lines for the story and result screens

use crate::{Difficulty, GameRng};
use rand::Rng;

pub const STORY_DIALOGUES: [&str; 3] = [
    "ふふ…お酌してくれるの？あなたの手から注がれるお酒…格別ね。…あら、顔が赤いわよ？そんなに緊張して、私を酔わせるつもり？それとも自分が酔いたいのかしら。",
    "ねえ知ってる？いま、この酒場では…私のNFTオーナーを決めるために、あなた達が取り合っているらしいわ。ふふ…どちらが勝つのか、楽しみにしているの。",
    "あら、来てくれたのね。最近ちょっと弱気でね…でも、あなたみたいなお得意様が励ましに来てくれると、また頑張れそう。今夜もゆっくりしていってちょうだい。",
];

/// Result lines for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLines {
    pub achieve: &'static str,
    pub fail: &'static str,
}

pub fn result_lines(difficulty: Difficulty) -> ResultLines {
    match difficulty {
        Difficulty::Easy => ResultLines {
            achieve: "ふふ…その調子なら、もっと強くなれるわねぇ…楽しみにしているわ。",
            fail: "まだまだ…これからだわ。焦らず…ゆっくりと、鍛えなさい。",
        },
        Difficulty::Normal => ResultLines {
            achieve: "ようやく…一人前になれたかしら。けれど、油断は…禁物よ。",
            fail: "惜しいわねぇ…あと一歩だったのに。その悔しさ…忘れないでね。",
        },
        Difficulty::Hard => ResultLines {
            achieve: "よくやったわ…ほんの少しだけ、褒めてあげる。だけど…もっと上を目指せるはずよ。",
            fail: "ふふ…この壁を越えてこそ、本物になれるの。逃げずに…挑みなさい。",
        },
    }
}

/// Pick a story line uniformly at random
pub fn pick_story(rng: &mut GameRng) -> &'static str {
    STORY_DIALOGUES[rng.0.gen_range(0..STORY_DIALOGUES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pick_story_is_deterministic_per_seed() {
        let a = pick_story(&mut GameRng::new(7));
        let b = pick_story(&mut GameRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_story_reaches_every_line() {
        let mut rng = GameRng::new(42);
        let seen: HashSet<_> = (0..200).map(|_| pick_story(&mut rng)).collect();
        assert_eq!(seen.len(), STORY_DIALOGUES.len());
    }

    #[test]
    fn test_result_lines_differ() {
        for difficulty in Difficulty::ALL {
            let lines = result_lines(difficulty);
            assert_ne!(lines.achieve, lines.fail, "{difficulty}");
        }
    }
}
