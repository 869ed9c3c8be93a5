use html_escape::encode_text;

use crate::{
    country::flag_emoji,
    types::{Match, Player, TeamSide},
};

fn side_label(players: &[Player]) -> String {
    players
        .iter()
        .map(|p| format!("{} {}", flag_emoji(&p.country), encode_text(&p.name)))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn status_label(m: &Match) -> &'static str {
    match m.winner {
        TeamSide::Side1 | TeamSide::Side2 => "Final",
        TeamSide::None if m.info.in_progress => "Live",
        TeamSide::None => "Unfinished",
    }
}

fn match_card(m: &Match) -> String {
    let scores = m
        .games
        .iter()
        .map(|g| format!("{}-{}", g.side1.points_won, g.side2.points_won))
        .collect::<Vec<_>>()
        .join(", ");

    let row = |side: TeamSide| {
        let stats = if side == TeamSide::Side1 { &m.side1 } else { &m.side2 };
        format!(
            r#"<tr class="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            if m.winner == side { "font-bold" } else { "" },
            side_label(m.info.side(side).unwrap_or_default()),
            m.games_won(side),
            stats.points_won,
            stats.max_consecutive_points,
            stats.game_points,
        )
    };

    format!(
        r#"<div class="bg-white rounded-lg shadow p-4 mb-4">
    <div class="text-sm text-gray-600 mb-2">{} &middot; {} &middot; {} min &middot; {} points</div>
    <table class="w-full text-left">
        <tr><th></th><th>Games</th><th>Points</th><th>Best run</th><th>Game points</th></tr>
        {}
        {}
    </table>
    <div class="text-sm text-gray-600 mt-2">{}</div>
</div>"#,
        status_label(m),
        m.info.start.format("%Y-%m-%d %H:%M UTC"),
        m.duration_minutes,
        m.points_played,
        row(TeamSide::Side1),
        row(TeamSide::Side2),
        scores,
    )
}

/// Index page listing recently updated matches.
pub fn matches_page(matches: &[Match]) -> String {
    let body = if matches.is_empty() {
        r#"<p class="text-gray-600">No matches in the last day.</p>"#.to_string()
    } else {
        matches.iter().map(match_card).collect::<Vec<_>>().join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Matches</title>
    <script src="https://unpkg.com/@tailwindcss/browser@4"></script>
</head>
<body class="bg-gray-100 min-h-screen p-8">
    <div class="max-w-3xl mx-auto">
        <h1 class="text-3xl font-bold mb-8 text-gray-800">Matches</h1>
        {}
        <a class="text-blue-600" href="/c/">Keep score</a>
    </div>
</body>
</html>"#,
        body
    )
}

/// Scorekeeping page. Creates a match on load and posts the whole document
/// after every rally.
pub const CLIENT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Keep score</title>
    <script src="https://unpkg.com/@tailwindcss/browser@4"></script>
    <script>
        let matchId = null;
        const doc = { info: { mode: 21, team1: [], team2: [], start: 0, end: 0 }, games: [{ points: [] }] };

        function player(id) {
            return { country: document.getElementById(id + '_country').value, player: document.getElementById(id + '_name').value };
        }

        async function post(body) {
            const response = await fetch('/api/', { method: 'POST', credentials: 'same-origin', body: JSON.stringify(body) });
            document.getElementById('status').textContent = response.ok ? 'Saved' : await response.text();
            return response;
        }

        async function start() {
            const response = await post({ action: 'new' });
            matchId = (await response.json()).match;
            doc.info.mode = parseInt(document.getElementById('mode').value);
            doc.info.team1 = [player('p1')];
            doc.info.team2 = [player('p2')];
            doc.info.start = Math.floor(Date.now() / 1000);
            await save();
        }

        function save() {
            const current = doc.games[doc.games.length - 1].points;
            const score = [1, 2].map(side => current.filter(p => p === side).length);
            document.getElementById('score').textContent = score.join(' : ');
            return post({ action: 'update', match: matchId, data: doc });
        }

        function point(side) {
            doc.games[doc.games.length - 1].points.push(side);
            save();
        }

        function undo() {
            doc.games[doc.games.length - 1].points.pop();
            save();
        }

        function nextGame() {
            doc.games.push({ points: [] });
            save();
        }

        function finish() {
            doc.info.end = Math.floor(Date.now() / 1000);
            save();
        }
    </script>
</head>
<body class="bg-gray-100 min-h-screen p-8">
    <div class="max-w-xl mx-auto bg-white rounded-lg shadow p-6">
        <select id="mode"><option value="21">21 points</option><option value="11">11 points</option></select>
        <div><input id="p1_country" placeholder="DK" size="2" /><input id="p1_name" placeholder="Player 1" /></div>
        <div><input id="p2_country" placeholder="TW" size="2" /><input id="p2_name" placeholder="Player 2" /></div>
        <button onclick="start()">Start</button>
        <p class="text-4xl font-bold text-center my-6" id="score">0 : 0</p>
        <button onclick="point(1)">Point 1</button>
        <button onclick="point(2)">Point 2</button>
        <button onclick="undo()">Undo</button>
        <button onclick="nextGame()">Next game</button>
        <button onclick="finish()">Finish</button>
        <p class="text-sm text-gray-600 mt-4" id="status"></p>
    </div>
</body>
</html>"#;
